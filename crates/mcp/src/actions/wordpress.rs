use std::time::Duration;

use async_trait::async_trait;
use forge_gate_api::{ForgeApiError, ForgeClient};
use forge_gate_util::{PollOutcome, PollPolicy, poll_until};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::summary::Summary;
use super::{ConfirmableAction, labelled, site_endpoint};
use crate::types::{ResourceId, ToolError};

/// Forge refuses WordPress while the site is briefly marked as having an app.
const APP_ALREADY_INSTALLED: &str = "application installed";

/// Timing of the install flow.
#[derive(Debug, Clone, Copy)]
struct InstallPacing {
    /// Install attempts while Forge still reports an application on the site.
    install: PollPolicy,
    /// Site checks until WordPress shows up as installed.
    ready: PollPolicy,
    /// Pause after deleting the previous site.
    deletion_grace: Duration,
}

const PACING: InstallPacing = InstallPacing {
    install: PollPolicy::fixed(10, Duration::from_millis(500)),
    ready: PollPolicy::fixed(60, Duration::from_secs(3)),
    deletion_grace: Duration::from_secs(5),
};

/// Install WordPress on a site, recreating it first by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallWordPress {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    pub server_name: String,
    #[schemars(
        description = "Existing site id. With createFreshSite it is deleted and recreated, otherwise WordPress is installed on it directly."
    )]
    pub site_id: Option<ResourceId>,
    #[schemars(description = "Domain of the WordPress site, for example example.com.")]
    pub site_name: String,
    #[schemars(description = "Database name from list_databases.")]
    pub database: String,
    #[schemars(description = "Numeric database user id from list_database_users, not the username.")]
    pub user_id: ResourceId,
    #[schemars(description = "Delete any existing site and create a fresh PHP site first. Defaults to true.")]
    pub create_fresh_site: Option<bool>,
    #[schemars(description = "Run the recreated site as its own system user.")]
    pub isolated: Option<bool>,
    #[schemars(description = "PHP version for the recreated site, for example php84.")]
    pub php_version: Option<String>,
}

impl InstallWordPress {
    fn fresh_site(&self) -> bool {
        self.create_fresh_site.unwrap_or(true)
    }

    fn site_payload(&self) -> Value {
        let mut payload = json!({ "domain": self.site_name, "project_type": "php" });
        if let Some(isolated) = self.isolated {
            payload["isolated"] = json!(isolated);
        }
        if let Some(php_version) = self.php_version.as_deref().filter(|version| !version.is_empty()) {
            payload["php_version"] = json!(php_version);
        }
        payload
    }

    fn wordpress_payload(&self) -> Value {
        json!({ "database": self.database, "user": self.user_id.to_json() })
    }

    async fn recreate_site(&self, client: &ForgeClient, pacing: &InstallPacing) -> Result<ResourceId, ToolError> {
        if let Some(site_id) = &self.site_id {
            match client.delete(site_endpoint(&self.server_id, site_id)).await {
                Ok(_) => tokio::time::sleep(pacing.deletion_grace).await,
                Err(error) => debug!(%error, "ignoring failure to delete the previous site"),
            }
        }
        let created = client
            .post(format!("/servers/{}/sites", self.server_id), Some(self.site_payload()))
            .await?;
        let id = created
            .pointer("/site/id")
            .ok_or_else(|| ToolError::unexpected("Forge did not return an id for the new site"))?;
        let raw = match id {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        ResourceId::parse(raw).map_err(ToolError::unexpected)
    }
}

/// Whether Forge rejected the install because the site still has an app.
fn reports_installed_app(error: &ForgeApiError) -> bool {
    match error.body() {
        Some(Value::String(text)) => text.contains(APP_ALREADY_INSTALLED),
        Some(body) => body.to_string().contains(APP_ALREADY_INSTALLED),
        None => false,
    }
}

async fn attempt_install(
    client: &ForgeClient,
    endpoint: &str,
    payload: &Value,
    policy: &PollPolicy,
) -> Result<Value, ToolError> {
    let mut attempt = 1;
    loop {
        match client.post(endpoint, Some(payload.clone())).await {
            Ok(data) => return Ok(data),
            Err(error) if attempt < policy.max_attempts && reports_installed_app(&error) => {
                debug!(attempt, "site still reports an application, retrying WordPress install");
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
            Err(error) => return Err(error.into()),
        }
    }
}

fn wordpress_ready(response: &Value) -> bool {
    let site = &response["site"];
    site["status"] == "installed" && site["app"] == "wordpress"
}

#[async_trait]
impl ConfirmableAction for InstallWordPress {
    const KIND: &'static str = "WordPress install";
    const PROPOSE_TOOL: &'static str = "confirm_install_wordpress";
    const EXECUTE_TOOL: &'static str = "install_wordpress";

    fn summary(&self) -> String {
        let mut summary = Summary::new("Please confirm WordPress installation with the following settings:");
        if let Some(site_id) = self.site_id.as_ref().filter(|_| self.fresh_site()) {
            summary = summary.warning(format!(
                "Existing site {site_id} will be deleted and recreated. Its files are lost."
            ));
        }
        summary = summary
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site Domain", &self.site_name);
        summary = match (&self.site_id, self.fresh_site()) {
            (Some(site_id), true) => summary.field("Existing Site ID", format!("{site_id} (will be deleted and recreated)")),
            (Some(site_id), false) => summary.field("Existing Site ID", format!("{site_id} (install on existing site)")),
            (None, _) => summary.field("New Site", "yes"),
        };
        summary
            .field("Database", &self.database)
            .field("Database User ID", &self.user_id)
            .field("Create Fresh Site", if self.fresh_site() { "yes" } else { "no" })
            .flag("Isolated", self.isolated)
            .optional("PHP Version", self.php_version.as_ref())
            .note("Visit the site URL afterwards to finish the WordPress setup wizard.")
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        if !self.fresh_site() && self.site_id.is_none() {
            return Err(ToolError::invalid("siteId is required when createFreshSite is false"));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        self.install(client, &PACING).await
    }
}

impl InstallWordPress {
    async fn install(&self, client: &ForgeClient, pacing: &InstallPacing) -> Result<Value, ToolError> {
        self.check()?;

        if !self.fresh_site() {
            let site_id = self
                .site_id
                .clone()
                .ok_or_else(|| ToolError::invalid("siteId is required when createFreshSite is false"))?;
            let endpoint = format!("{}/wordpress", site_endpoint(&self.server_id, &site_id));
            let data = attempt_install(client, &endpoint, &self.wordpress_payload(), &pacing.install).await?;
            return Ok(json!({
                "success": true,
                "message": format!(
                    "WordPress installation initiated on site {} (ID: {site_id}). Visit the site URL to complete the WordPress setup wizard.",
                    self.site_name
                ),
                "siteId": site_id,
                "data": data,
            }));
        }

        let site_id = self.recreate_site(client, pacing).await?;
        let site = site_endpoint(&self.server_id, &site_id);
        let wordpress = format!("{site}/wordpress");
        let data = attempt_install(client, &wordpress, &self.wordpress_payload(), &pacing.install).await?;

        let outcome = poll_until(&pacing.ready, |_| client.get(site.clone()), wordpress_ready).await;
        Ok(match outcome {
            PollOutcome::Done { value, .. } => json!({
                "success": true,
                "message": format!(
                    "WordPress successfully installed on site {} (ID: {site_id}). Visit the site URL to complete the WordPress setup wizard.",
                    self.site_name
                ),
                "siteId": site_id,
                "site": value.get("site").cloned().unwrap_or(Value::Null),
                "data": data,
                "status": "installed",
            }),
            PollOutcome::Pending { .. } => json!({
                "success": true,
                "message": format!(
                    "WordPress installation initiated on site {} (ID: {site_id}). Installation is in progress. Visit the site URL to complete the WordPress setup wizard once installation finishes.",
                    self.site_name
                ),
                "siteId": site_id,
                "data": data,
                "status": "installing",
            }),
        })
    }
}

/// Remove WordPress from a site. The database is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UninstallWordPress {
    pub server_id: ResourceId,
    pub server_name: String,
    pub site_id: ResourceId,
    pub site_name: String,
}

#[async_trait]
impl ConfirmableAction for UninstallWordPress {
    const KIND: &'static str = "WordPress uninstall";
    const PROPOSE_TOOL: &'static str = "confirm_uninstall_wordpress";
    const EXECUTE_TOOL: &'static str = "uninstall_wordpress";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to uninstall WordPress from this site?")
            .warning("WordPress files are removed from the site. The database will NOT be deleted.")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site", labelled(&self.site_name, &self.site_id))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/wordpress", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.delete(endpoint).await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    use super::*;
    use crate::actions::fake_forge;

    const QUICK: InstallPacing = InstallPacing {
        install: PollPolicy::fixed(3, Duration::from_millis(1)),
        ready: PollPolicy::fixed(3, Duration::from_millis(1)),
        deletion_grace: Duration::ZERO,
    };

    fn app_still_installed() -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({"message": "The site has an application installed."})),
        )
            .into_response()
    }

    fn site(status: &str) -> Response {
        axum::Json(json!({"site": {"id": 5, "status": status, "app": "wordpress"}})).into_response()
    }

    fn not_found() -> Response {
        (StatusCode::NOT_FOUND, axum::Json(json!({"message": "Not Found"}))).into_response()
    }

    fn install() -> InstallWordPress {
        serde_json::from_value(json!({
            "serverId": "1",
            "serverName": "web-1",
            "siteId": "2",
            "siteName": "blog.example.com",
            "database": "wordpress",
            "userId": 12
        }))
        .unwrap()
    }

    #[test]
    fn existing_site_without_fresh_flag_requires_site_id() {
        let mut request = install();
        request.create_fresh_site = Some(false);
        request.site_id = None;
        let error = request.check().unwrap_err();
        assert_eq!(error.to_string(), "siteId is required when createFreshSite is false");
    }

    #[test]
    fn fresh_install_over_an_existing_site_warns() {
        let summary = install().summary();
        assert!(summary.starts_with("WARNING: Existing site 2 will be deleted"));
        assert!(summary.contains("Database User ID: 12"));
        assert!(summary.contains("Create Fresh Site: yes"));
    }

    #[test]
    fn user_id_is_sent_as_a_number() {
        assert_eq!(install().wordpress_payload(), json!({"database": "wordpress", "user": 12}));
    }

    #[test]
    fn site_payload_forwards_only_present_options() {
        let mut request = install();
        assert_eq!(request.site_payload(), json!({"domain": "blog.example.com", "project_type": "php"}));
        request.isolated = Some(true);
        request.php_version = Some("php83".into());
        assert_eq!(request.site_payload()["php_version"], "php83");
        assert_eq!(request.site_payload()["isolated"], true);
    }

    #[test]
    fn readiness_needs_both_status_and_app() {
        assert!(wordpress_ready(&json!({"site": {"status": "installed", "app": "wordpress"}})));
        assert!(!wordpress_ready(&json!({"site": {"status": "installing", "app": "wordpress"}})));
        assert!(!wordpress_ready(&json!({"site": {"status": "installed", "app": null}})));
        assert!(!wordpress_ready(&json!({})));
    }

    #[test]
    fn uninstall_keeps_the_database() {
        let summary = UninstallWordPress {
            server_id: ResourceId::from(1),
            server_name: "web-1".into(),
            site_id: ResourceId::from(2),
            site_name: "blog.example.com".into(),
        }
        .summary();
        assert!(summary.starts_with("WARNING:"));
        assert!(summary.contains("The database will NOT be deleted."));
    }

    #[test]
    fn installed_app_is_detected_from_the_full_body() {
        let api_error = |body: Value| ForgeApiError::Api {
            method: "POST".into(),
            endpoint: "/servers/1/sites/5/wordpress".into(),
            status: 422,
            body,
        };
        let padded = format!("{} The site has an application installed.", "x".repeat(600));
        assert!(reports_installed_app(&api_error(json!({ "message": padded }))));
        assert!(reports_installed_app(&api_error(json!("site has an application installed"))));
        assert!(!reports_installed_app(&api_error(json!({"message": "The given data was invalid."}))));
        assert!(!reports_installed_app(&ForgeApiError::MissingApiKey));
    }

    #[tokio::test]
    async fn fresh_install_recreates_the_site_and_waits_until_ready() {
        let (client, recorder) = fake_forge::spawn(|method, path, earlier| match (method.as_str(), path) {
            ("DELETE", "/api/v1/servers/1/sites/2") => StatusCode::OK.into_response(),
            ("POST", "/api/v1/servers/1/sites") => axum::Json(json!({"site": {"id": 5}})).into_response(),
            ("POST", "/api/v1/servers/1/sites/5/wordpress") if earlier < 2 => app_still_installed(),
            ("POST", "/api/v1/servers/1/sites/5/wordpress") => StatusCode::OK.into_response(),
            ("GET", "/api/v1/servers/1/sites/5") if earlier == 0 => site("installing"),
            ("GET", "/api/v1/servers/1/sites/5") => site("installed"),
            _ => not_found(),
        })
        .await;

        let result = install().install(&client, &QUICK).await.unwrap();
        assert_eq!(result["status"], "installed");
        assert_eq!(result["siteId"], "5");
        assert_eq!(result["site"]["app"], "wordpress");

        let routes = fake_forge::routes(&recorder);
        let expected = [
            ("DELETE", "/api/v1/servers/1/sites/2"),
            ("POST", "/api/v1/servers/1/sites"),
            ("POST", "/api/v1/servers/1/sites/5/wordpress"),
            ("POST", "/api/v1/servers/1/sites/5/wordpress"),
            ("POST", "/api/v1/servers/1/sites/5/wordpress"),
            ("GET", "/api/v1/servers/1/sites/5"),
            ("GET", "/api/v1/servers/1/sites/5"),
        ];
        assert_eq!(
            routes,
            expected
                .iter()
                .map(|(method, path)| (method.to_string(), path.to_string()))
                .collect::<Vec<_>>()
        );
        let created: Value = serde_json::from_str(&recorder.lock().unwrap()[1].2).unwrap();
        assert_eq!(created["domain"], "blog.example.com");
    }

    #[tokio::test]
    async fn slow_install_is_reported_as_in_progress() {
        let (client, recorder) = fake_forge::spawn(|method, path, _| match (method.as_str(), path) {
            ("POST", "/api/v1/servers/1/sites") => axum::Json(json!({"site": {"id": 5}})).into_response(),
            ("GET", "/api/v1/servers/1/sites/5") => site("installing"),
            ("DELETE", _) => not_found(),
            _ => StatusCode::OK.into_response(),
        })
        .await;

        let result = install().install(&client, &QUICK).await.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["status"], "installing");
        assert!(result["message"].as_str().unwrap().contains("Installation is in progress"));

        // The failed delete does not stop the flow.
        let routes = fake_forge::routes(&recorder);
        assert_eq!(routes[0].0, "DELETE");
        assert_eq!(routes.iter().filter(|(method, _)| method == "GET").count(), 3);
    }

    #[tokio::test]
    async fn install_retries_stop_after_the_last_attempt() {
        let (client, recorder) = fake_forge::spawn(|_, _, _| app_still_installed()).await;
        let mut request = install();
        request.create_fresh_site = Some(false);

        let error = request.install(&client, &QUICK).await.unwrap_err();
        assert_eq!(error.code(), "remote_api_error");
        assert_eq!(recorder.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn other_install_failures_are_not_retried() {
        let (client, recorder) = fake_forge::spawn(|_, _, _| not_found()).await;
        let mut request = install();
        request.create_fresh_site = Some(false);

        let error = request.install(&client, &QUICK).await.unwrap_err();
        assert_eq!(error.code(), "remote_api_error");
        assert_eq!(
            fake_forge::routes(&recorder),
            vec![("POST".to_string(), "/api/v1/servers/1/sites/2/wordpress".to_string())]
        );
    }
}
