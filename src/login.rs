//! The netlib.re login flow, one isolated browser session per account.
//!
//! The site is a classic server-rendered form: a `Login` navigation link,
//! username and password inputs, and a `Validate` submit button. After a
//! successful login the account page shows the domains the user is the
//! exclusive owner of.

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{self, BrowserSession};
use crate::config::{Account, Config};
use crate::report::LoginResult;

/// Marker the account page renders once authenticated.
const SUCCESS_MARKER: &str = "exclusive owner";

// Fixed settle delays matching the site's client-side rendering pace
const PAGE_SETTLE: Duration = Duration::from_secs(3);
const NAV_SETTLE: Duration = Duration::from_secs(2);
const FIELD_SETTLE: Duration = Duration::from_secs(1);
const SUBMIT_SETTLE: Duration = Duration::from_secs(5);

const USERNAME_FIELDS: &str = "input[name='username'], input[type='text']";
const PASSWORD_FIELDS: &str = "input[name='password'], input[type='password']";
const SUBMIT_CONTROLS: &str = "input[type='submit'], button[type='submit']";

/// Attempt to log `account` in.
///
/// Never fails: every error is converted into a failed [`LoginResult`] so
/// the run continues with the next account.
pub async fn login_account(config: &Config, account: &Account) -> LoginResult {
    info!(username = %account.username, "starting login");

    match try_login(config, account).await {
        Ok(true) => {
            info!(username = %account.username, "login succeeded");
            LoginResult::succeeded(&account.username)
        }
        Ok(false) => {
            warn!(username = %account.username, "login failed, success marker not found");
            LoginResult::failed(&account.username, "login failed")
        }
        Err(e) => {
            warn!(username = %account.username, error = %format!("{e:#}"), "login errored");
            LoginResult::failed(&account.username, &format!("login error: {e:#}"))
        }
    }
}

async fn try_login(config: &Config, account: &Account) -> Result<bool> {
    let session = BrowserSession::launch(config.step_timeout, config.headful).await?;

    let outcome = async {
        let page = session.open(config.login_url.as_str()).await?;
        let outcome = drive_login(&page, account).await;
        if let Err(e) = page.close().await {
            debug!(error = %e, "page did not close cleanly");
        }
        outcome
    }
    .await;

    // The session comes down even when the flow errored
    session.close().await;
    outcome
}

async fn drive_login(page: &Page, account: &Account) -> Result<bool> {
    sleep(PAGE_SETTLE).await;

    debug!("opening the login form");
    browser::click_text(page, "Login")
        .await
        .context("login link not found")?;
    sleep(NAV_SETTLE).await;

    debug!("filling username");
    browser::type_into(page, USERNAME_FIELDS, &account.username)
        .await
        .context("username field not found")?;
    sleep(FIELD_SETTLE).await;

    debug!("filling password");
    browser::type_into(page, PASSWORD_FIELDS, &account.password)
        .await
        .context("password field not found")?;
    sleep(FIELD_SETTLE).await;

    debug!("submitting credentials");
    if let Err(e) = browser::click_text(page, "Validate").await {
        debug!(error = %e, "no Validate button, trying a submit control");
        browser::click(page, SUBMIT_CONTROLS)
            .await
            .context("submit control not found")?;
    }

    page.wait_for_navigation().await.ok();
    sleep(SUBMIT_SETTLE).await;

    let content = browser::content(page).await?;
    Ok(is_login_success(&content, &account.username))
}

/// A login landed when the page shows the ownership blurb or names the user.
pub fn is_login_success(content: &str, username: &str) -> bool {
    content.contains(SUCCESS_MARKER) || content.contains(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_blurb_marks_success() {
        let page = "<p>You are the exclusive owner of these domains.</p>";
        assert!(is_login_success(page, "alice"));
    }

    #[test]
    fn username_in_page_marks_success() {
        let page = "<span class=\"user\">alice</span>";
        assert!(is_login_success(page, "alice"));
    }

    #[test]
    fn unrelated_page_marks_failure() {
        let page = "<h1>Please log in</h1><form></form>";
        assert!(!is_login_success(page, "alice"));
    }
}
