pub mod cases;
pub mod config;
pub mod lifecycle;
pub mod suite;

pub use cases::{AccountTest, EntityTest, GlobalUnitTest, SessionTest, TestCase};
pub use config::{
    load_api_config, ConfigError, ConfigOverrides, ConfigResult, Credentials, HarnessConfig,
    API_URL_VAR, EMAIL_VAR, SECRET_VAR, USER_ID_VAR,
};
pub use lifecycle::{ensure, Failure, Note, Test, UsageError};
pub use suite::{HarnessError, HarnessResult, Suite, SuiteReport};
