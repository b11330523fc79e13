//! Auth - Bearer Token 校验
//!
//! 令牌由外部认证服务签发（HS256），这里只读取 `role` 声明判断是否为管理员

mod jwt;

pub use jwt::{AuthError, Claims, Role, TokenService};
