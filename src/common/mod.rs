pub mod auth;
pub mod mapper;
pub mod messages;
pub mod options;
pub mod parsing;

pub use self::auth::Authentication;
pub use self::mapper::ParametersMapper;
pub use self::options::InvokeOptions;
