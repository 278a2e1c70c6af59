use crate::core::SessionDriver;
use crate::errors::DriverResult;

/// Page objects for the three surfaces the flow touches. Selectors are the
/// target application's, not ours; they change when the target changes.
pub struct LoginPage;

impl LoginPage {
    pub const USERNAME_INPUT: &'static str = "#username";
    pub const PASSWORD_INPUT: &'static str = "#password";
    pub const LOGIN_BUTTON: &'static str = "#Login";

    pub async fn login(
        driver: &dyn SessionDriver,
        username: &str,
        password: &str,
    ) -> DriverResult<()> {
        driver.set_value(Self::USERNAME_INPUT, username).await?;
        driver.set_value(Self::PASSWORD_INPUT, password).await?;
        driver.click(Self::LOGIN_BUTTON).await
    }
}

pub struct HomePage;

impl HomePage {
    pub const USER_NAV_BUTTON: &'static str = ".userNavButton";
    pub const LOGOUT_LINK: &'static str = "a[title='Logout']";

    /// Post-login-only element; its visibility is the login assertion.
    pub async fn is_logged_in(driver: &dyn SessionDriver, timeout_ms: u64) -> DriverResult<bool> {
        driver
            .wait_for_visible(Self::USER_NAV_BUTTON, timeout_ms)
            .await
    }

    pub async fn logout(driver: &dyn SessionDriver, timeout_ms: u64) -> DriverResult<bool> {
        driver.click(Self::USER_NAV_BUTTON).await?;
        if !driver
            .wait_for_visible(Self::LOGOUT_LINK, timeout_ms)
            .await?
        {
            return Ok(false);
        }
        driver.click(Self::LOGOUT_LINK).await?;
        Ok(true)
    }
}

pub struct ChangePasswordPage;

impl ChangePasswordPage {
    pub const CURRENT_PASSWORD_INPUT: &'static str = "#currentpassword";
    pub const NEW_PASSWORD_INPUT: &'static str = "#newpassword";
    pub const CONFIRM_PASSWORD_INPUT: &'static str = "#confirmpassword";
    pub const SECURITY_ANSWER_INPUT: &'static str = "#answer";
    pub const CHANGE_PASSWORD_BUTTON: &'static str = "#password-button";

    pub async fn change_password(
        driver: &dyn SessionDriver,
        current_password: &str,
        new_password: &str,
        security_answer: &str,
    ) -> DriverResult<()> {
        driver
            .set_value(Self::CURRENT_PASSWORD_INPUT, current_password)
            .await?;
        driver
            .set_value(Self::NEW_PASSWORD_INPUT, new_password)
            .await?;
        driver
            .set_value(Self::CONFIRM_PASSWORD_INPUT, new_password)
            .await?;
        driver
            .set_value(Self::SECURITY_ANSWER_INPUT, security_answer)
            .await?;
        driver.click(Self::CHANGE_PASSWORD_BUTTON).await
    }
}
