//! Login agent selection: the LINE app, one browser, or a chooser.

use std::fmt;
use std::sync::Arc;

use linesdk_domain::constants::{LINE_APP_PACKAGE_NAME, MIN_LINE_APP_VERSION};
use linesdk_domain::{LineSdkError, Result};
use tracing::debug;
use url::Url;

use super::ports::AgentEnvironment;

/// `major.minor.revision` of the installed LINE app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineAppVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl LineAppVersion {
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self { major, minor, revision }
    }

    /// Oldest build that accepts `scope` in app-to-app login.
    pub const MINIMUM: Self =
        Self::new(MIN_LINE_APP_VERSION.0, MIN_LINE_APP_VERSION.1, MIN_LINE_APP_VERSION.2);

    /// Parse the first three dot-separated numbers of a version name.
    ///
    /// Trailing components are ignored; fewer than three or a non-number
    /// yields `None`.
    #[must_use]
    pub fn parse(version_name: &str) -> Option<Self> {
        let mut parts = version_name.split('.').filter(|part| !part.is_empty());
        let major = parts.next()?.trim().parse().ok()?;
        let minor = parts.next()?.trim().parse().ok()?;
        let revision = parts.next()?.trim().parse().ok()?;
        Some(Self { major, minor, revision })
    }

    #[must_use]
    pub fn is_equal_or_greater_than(&self, other: &Self) -> bool {
        self >= other
    }
}

impl fmt::Display for LineAppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// What the host should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentIntent {
    /// VIEW `uri` in one specific package.
    Targeted { package: String, uri: Url },
    /// Let the user pick; always shown, never remembered as a default.
    Chooser { primary: Box<AgentIntent>, initial_intents: Vec<AgentIntent> },
}

impl AgentIntent {
    /// Packages the intent can end up in, primary first.
    #[must_use]
    pub fn packages(&self) -> Vec<&str> {
        match self {
            Self::Targeted { package, .. } => vec![package.as_str()],
            Self::Chooser { primary, initial_intents } => primary
                .packages()
                .into_iter()
                .chain(initial_intents.iter().flat_map(AgentIntent::packages))
                .collect(),
        }
    }
}

/// Agent chosen for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAgent {
    pub intent: AgentIntent,
    /// The LINE app answers through a new intent, not an activity result.
    pub is_app_authentication: bool,
}

/// Chooses between the LINE app and the installed browsers.
pub struct AgentResolver {
    environment: Arc<dyn AgentEnvironment>,
}

impl AgentResolver {
    /// Resolver that queries `environment` for installed packages.
    pub fn new(environment: Arc<dyn AgentEnvironment>) -> Self {
        Self { environment }
    }

    /// Package of the hosting app, used in the redirect URI.
    #[must_use]
    pub fn host_package_name(&self) -> String {
        self.environment.host_package_name()
    }

    /// Pick the agent for `login_uri`.
    ///
    /// Fails with `NotFound` when neither the LINE app nor any browser can
    /// open the URI.
    pub fn resolve(&self, login_uri: &Url, app_auth_allowed: bool) -> Result<ResolvedAgent> {
        if app_auth_allowed && self.line_app_usable(login_uri) {
            debug!("Using LINE app for login");
            return Ok(ResolvedAgent {
                intent: AgentIntent::Targeted {
                    package: LINE_APP_PACKAGE_NAME.to_owned(),
                    uri: login_uri.clone(),
                },
                is_app_authentication: true,
            });
        }

        let mut targets: Vec<AgentIntent> = self
            .environment
            .browser_packages()
            .into_iter()
            .map(|package| AgentIntent::Targeted { package, uri: login_uri.clone() })
            .collect();

        let intent = match targets.len() {
            0 => {
                return Err(LineSdkError::NotFound(format!(
                    "Activity for LINE log-in is not found. uri={login_uri}"
                )))
            }
            1 => targets.remove(0),
            _ => {
                let primary = Box::new(targets.remove(0));
                AgentIntent::Chooser { primary, initial_intents: targets }
            }
        };
        debug!(candidates = intent.packages().len(), "Using browser for login");
        Ok(ResolvedAgent { intent, is_app_authentication: false })
    }

    fn line_app_usable(&self, login_uri: &Url) -> bool {
        let Some(version) = self
            .environment
            .installed_version(LINE_APP_PACKAGE_NAME)
            .as_deref()
            .and_then(LineAppVersion::parse)
        else {
            return false;
        };
        version.is_equal_or_greater_than(&LineAppVersion::MINIMUM)
            && self.environment.can_handle(LINE_APP_PACKAGE_NAME, login_uri.as_str())
    }
}
