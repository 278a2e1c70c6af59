pub mod pages;
pub mod script;

pub use pages::{ChangePasswordPage, HomePage, LoginPage};
pub use script::{FlowScript, RotationFlow};
