//! Ordering Engine - 同级排序维护
//!
//! 维护同一父级（章节内的 Part）下稠密、从 1 开始的 order 序列。
//! 所有函数都是纯函数：输入当前同级快照，输出需要写入的 order 变更，
//! 由仓储层在一个事务内整体落库。

use thiserror::Error;

/// 同级中的一个位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<K> {
    pub key: K,
    pub order: u32,
}

impl<K> Slot<K> {
    pub fn new(key: K, order: u32) -> Self {
        Self { key, order }
    }
}

/// 单条 order 变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderShift<K> {
    pub key: K,
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Order {order} is out of range, must be between 1 and {max}")]
    OutOfRange { order: u32, max: u32 },

    #[error("Item is not part of this sequence")]
    UnknownItem,
}

/// 插入计划：新条目的 order 以及需要让位的同级
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan<K> {
    pub order: u32,
    pub shifts: Vec<OrderShift<K>>,
}

/// 末尾追加时的 order（空序列为 1）
pub fn next_order<K>(slots: &[Slot<K>]) -> u32 {
    slots.iter().map(|s| s.order).max().unwrap_or(0) + 1
}

/// 序列是否恰好为 {1..N}
pub fn is_dense<K>(slots: &[Slot<K>]) -> bool {
    let mut orders: Vec<u32> = slots.iter().map(|s| s.order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(index, order)| *order as usize == index + 1)
}

/// 移动目标允许的上界；旧数据可能存在空洞，取数量与最大值中较大者
fn upper_bound<K>(slots: &[Slot<K>]) -> u32 {
    let max = slots.iter().map(|s| s.order).max().unwrap_or(0);
    max.max(slots.len() as u32)
}

/// 计算插入
///
/// - 未指定 order：追加到末尾（max + 1）
/// - 指定 order 且已被占用：该位置及之后的同级全部 +1，腾出位置
/// - 指定 order 必须在 [1, max + 1] 之间
pub fn plan_insert<K: Copy>(
    slots: &[Slot<K>],
    requested: Option<u32>,
) -> Result<InsertPlan<K>, OrderingError> {
    let append_at = next_order(slots);

    let Some(order) = requested else {
        return Ok(InsertPlan {
            order: append_at,
            shifts: Vec::new(),
        });
    };

    if order == 0 || order > append_at {
        return Err(OrderingError::OutOfRange {
            order,
            max: append_at,
        });
    }

    let occupied = slots.iter().any(|s| s.order == order);
    let shifts = if occupied {
        slots
            .iter()
            .filter(|s| s.order >= order)
            .map(|s| OrderShift {
                key: s.key,
                from: s.order,
                to: s.order + 1,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(InsertPlan { order, shifts })
}

/// 计算移动
///
/// 当前位置 o，目标位置 t:
/// - t == o：无变更
/// - t 已被其他条目占用：
///   - 下移 (t > o)：(o, t] 内的其他条目 -1
///   - 上移 (t < o)：[t, o) 内的其他条目 +1
/// - t 未被占用：只改动被移动的条目
///
/// 返回的变更中最后一条是被移动条目本身
pub fn plan_move<K: Copy + Eq>(
    slots: &[Slot<K>],
    key: K,
    target: u32,
) -> Result<Vec<OrderShift<K>>, OrderingError> {
    let current = slots
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.order)
        .ok_or(OrderingError::UnknownItem)?;

    let max = upper_bound(slots);
    if target == 0 || target > max {
        return Err(OrderingError::OutOfRange { order: target, max });
    }

    if target == current {
        return Ok(Vec::new());
    }

    let others = slots.iter().filter(|s| s.key != key);
    let occupied = others.clone().any(|s| s.order == target);

    let mut shifts: Vec<OrderShift<K>> = if !occupied {
        Vec::new()
    } else if target > current {
        others
            .filter(|s| s.order > current && s.order <= target)
            .map(|s| OrderShift {
                key: s.key,
                from: s.order,
                to: s.order - 1,
            })
            .collect()
    } else {
        others
            .filter(|s| s.order >= target && s.order < current)
            .map(|s| OrderShift {
                key: s.key,
                from: s.order,
                to: s.order + 1,
            })
            .collect()
    };

    shifts.push(OrderShift {
        key,
        from: current,
        to: target,
    });

    Ok(shifts)
}

/// 计算删除后的压缩：order 大于被删条目的同级全部 -1
pub fn plan_removal<K: Copy + Eq>(
    slots: &[Slot<K>],
    key: K,
) -> Result<Vec<OrderShift<K>>, OrderingError> {
    let removed = slots
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.order)
        .ok_or(OrderingError::UnknownItem)?;

    Ok(slots
        .iter()
        .filter(|s| s.key != key && s.order > removed)
        .map(|s| OrderShift {
            key: s.key,
            from: s.order,
            to: s.order - 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chapter(n: u32) -> Vec<Slot<u32>> {
        // key == 初始 order，便于断言
        (1..=n).map(|i| Slot::new(i, i)).collect()
    }

    fn apply(slots: &mut Vec<Slot<u32>>, shifts: &[OrderShift<u32>]) {
        for shift in shifts {
            let slot = slots.iter_mut().find(|s| s.key == shift.key).unwrap();
            assert_eq!(slot.order, shift.from);
            slot.order = shift.to;
        }
    }

    fn order_of(slots: &[Slot<u32>], key: u32) -> u32 {
        slots.iter().find(|s| s.key == key).unwrap().order
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order::<u32>(&[]), 1);
        assert_eq!(next_order(&chapter(4)), 5);
    }

    #[test]
    fn test_insert_appends_by_default() {
        let plan = plan_insert(&chapter(3), None).unwrap();
        assert_eq!(plan.order, 4);
        assert!(plan.shifts.is_empty());
    }

    #[test]
    fn test_insert_at_end_does_not_shift() {
        let plan = plan_insert(&chapter(3), Some(4)).unwrap();
        assert_eq!(plan.order, 4);
        assert!(plan.shifts.is_empty());
    }

    #[test]
    fn test_insert_into_occupied_slot_opens_it() {
        let mut slots = chapter(3);
        let plan = plan_insert(&slots, Some(2)).unwrap();
        apply(&mut slots, &plan.shifts);
        slots.push(Slot::new(99, plan.order));

        assert_eq!(order_of(&slots, 1), 1);
        assert_eq!(order_of(&slots, 99), 2);
        assert_eq!(order_of(&slots, 2), 3);
        assert_eq!(order_of(&slots, 3), 4);
        assert!(is_dense(&slots));
    }

    #[test]
    fn test_insert_out_of_range() {
        assert_eq!(
            plan_insert(&chapter(3), Some(6)).unwrap_err(),
            OrderingError::OutOfRange { order: 6, max: 4 }
        );
        assert!(plan_insert(&chapter(3), Some(0)).is_err());
    }

    #[test]
    fn test_move_same_position_is_noop() {
        assert!(plan_move(&chapter(3), 2, 2).unwrap().is_empty());
    }

    #[test]
    fn test_move_down_example() {
        // [A=1, B=2, C=3]，B 移到 3 -> A=1, C=2, B=3
        let mut slots = chapter(3);
        let shifts = plan_move(&slots, 2, 3).unwrap();
        apply(&mut slots, &shifts);

        assert_eq!(order_of(&slots, 1), 1);
        assert_eq!(order_of(&slots, 3), 2);
        assert_eq!(order_of(&slots, 2), 3);
    }

    #[test]
    fn test_move_up_three_to_one_in_five() {
        let mut slots = chapter(5);
        let shifts = plan_move(&slots, 3, 1).unwrap();
        apply(&mut slots, &shifts);

        assert_eq!(order_of(&slots, 3), 1);
        assert_eq!(order_of(&slots, 1), 2);
        assert_eq!(order_of(&slots, 2), 3);
        assert_eq!(order_of(&slots, 4), 4);
        assert_eq!(order_of(&slots, 5), 5);
        assert!(is_dense(&slots));
        // 4、5 不在变更集中
        assert!(shifts.iter().all(|s| s.key != 4 && s.key != 5));
    }

    #[test]
    fn test_move_into_gap_only_moves_item() {
        // 旧数据：orders = {1, 2, 5}
        let slots = vec![Slot::new(1, 1), Slot::new(2, 2), Slot::new(3, 5)];
        let shifts = plan_move(&slots, 1, 3).unwrap();
        assert_eq!(
            shifts,
            vec![OrderShift {
                key: 1,
                from: 1,
                to: 3
            }]
        );
    }

    #[test]
    fn test_move_out_of_range() {
        assert_eq!(
            plan_move(&chapter(3), 1, 4).unwrap_err(),
            OrderingError::OutOfRange { order: 4, max: 3 }
        );
        assert!(plan_move(&chapter(3), 1, 0).is_err());
    }

    #[test]
    fn test_move_unknown_item() {
        assert_eq!(
            plan_move(&chapter(3), 42, 1).unwrap_err(),
            OrderingError::UnknownItem
        );
    }

    #[test]
    fn test_removal_compacts_trailing_only() {
        let mut slots = chapter(5);
        let shifts = plan_removal(&slots, 2).unwrap();
        slots.retain(|s| s.key != 2);
        apply(&mut slots, &shifts);

        assert_eq!(order_of(&slots, 1), 1);
        assert_eq!(order_of(&slots, 3), 2);
        assert_eq!(order_of(&slots, 4), 3);
        assert_eq!(order_of(&slots, 5), 4);
        assert_eq!(shifts.len(), 3);
        assert!(is_dense(&slots));
    }

    #[test]
    fn test_removal_of_last_has_no_shifts() {
        assert!(plan_removal(&chapter(3), 3).unwrap().is_empty());
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense::<u32>(&[]));
        assert!(is_dense(&chapter(4)));
        assert!(!is_dense(&[Slot::new(1, 1), Slot::new(2, 3)]));
        assert!(!is_dense(&[Slot::new(1, 1), Slot::new(2, 1)]));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(Option<u32>),
        Move(usize, u32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::option::of(1u32..12).prop_map(Op::Insert),
            (0usize..12, 1u32..12).prop_map(|(i, t)| Op::Move(i, t)),
            (0usize..12).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_orders_stay_dense(ops in proptest::collection::vec(op(), 0..40)) {
            let mut slots: Vec<Slot<u32>> = Vec::new();
            let mut next_key = 0u32;

            for op in ops {
                match op {
                    Op::Insert(requested) => {
                        if let Ok(plan) = plan_insert(&slots, requested) {
                            apply(&mut slots, &plan.shifts);
                            slots.push(Slot::new(next_key, plan.order));
                            next_key += 1;
                        }
                    }
                    Op::Move(index, target) => {
                        if let Some(key) = slots.get(index % slots.len().max(1)).map(|s| s.key) {
                            if let Ok(shifts) = plan_move(&slots, key, target) {
                                apply(&mut slots, &shifts);
                            }
                        }
                    }
                    Op::Remove(index) => {
                        if let Some(key) = slots.get(index % slots.len().max(1)).map(|s| s.key) {
                            let shifts = plan_removal(&slots, key).unwrap();
                            slots.retain(|s| s.key != key);
                            apply(&mut slots, &shifts);
                        }
                    }
                }
                prop_assert!(is_dense(&slots));
            }
        }
    }
}
