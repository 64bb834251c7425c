use std::sync::Arc;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use atlaserp_api::app::{ApiConfig, AppServices, build_app};
use atlaserp_auth::{AccountRecord, Module, ModuleGrants, Role, password};
use atlaserp_core::TenantId;
use atlaserp_infra::TenantProfile;

const SESSION_SECRET: &str = "test-session-secret-0123456789abcdef";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: Arc<AppServices>) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = ApiConfig {
            session_secret: SESSION_SECRET.to_string(),
            secure_cookies: false,
        };
        let app = build_app(&config, services).expect("failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seed_account(
    services: &AppServices,
    email: &str,
    pass: &str,
    role: Role,
    tenant_id: Option<TenantId>,
    modules: ModuleGrants,
) {
    let account = AccountRecord::new(
        email,
        password::hash_password(pass).unwrap(),
        "Seeded",
        role,
        tenant_id,
        modules,
        Utc::now(),
    )
    .unwrap();
    services.accounts.insert(account).unwrap();
}

fn register_tenant(services: &AppServices, name: &str) -> TenantId {
    let profile = TenantProfile::new(name, Utc::now()).unwrap();
    services.tenants.insert(profile).unwrap()
}

/// Two-tenant fixture: two registered tenants, one super-admin, per-tenant
/// owners, and one staff account in tenant A granted only CRM.
fn seed_world(services: &AppServices) -> (TenantId, TenantId) {
    let tenant_a = register_tenant(services, "Tenant A");
    let tenant_b = register_tenant(services, "Tenant B");

    seed_account(
        services,
        "root@example.com",
        "root-password",
        Role::SuperAdmin,
        None,
        ModuleGrants::all(),
    );
    seed_account(
        services,
        "owner-a@example.com",
        "owner-a-password",
        Role::Owner,
        Some(tenant_a),
        ModuleGrants::all(),
    );
    seed_account(
        services,
        "owner-b@example.com",
        "owner-b-password",
        Role::Owner,
        Some(tenant_b),
        ModuleGrants::all(),
    );
    seed_account(
        services,
        "staff-a@example.com",
        "staff-a-password",
        Role::Staff,
        Some(tenant_a),
        ModuleGrants::none().with(Module::Crm, true),
    );

    (tenant_a, tenant_b)
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str, pass: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": email, "password": pass }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login failed for {email}");

    let set_cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn anonymous_api_requests_get_401() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    for path in ["/api/hr/employees", "/api/crm/contacts", "/api/admin/users", "/api/dashboard"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn anonymous_page_requests_redirect_to_login() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let res = client
        .get(format!("{}/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();

    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/login");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();

    // Wrong password on a real account.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "owner-a@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    let wrong_password_status = res.status();
    let wrong_password_body = res.text().await.unwrap();

    // Account that does not exist at all.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "ghost@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.status(), wrong_password_status);
    assert_eq!(res.text().await.unwrap(), wrong_password_body);
}

#[tokio::test]
async fn module_grants_gate_api_areas() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let cookie = login(&client, &srv.base_url, "staff-a@example.com", "staff-a-password").await;

    // Granted module.
    let res = client
        .get(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Ungranted module on the same session.
    let res = client
        .get(format!("{}/api/hr/employees", srv.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_surface_rejects_owners() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();

    // An owner with every module grant still has no admin rank.
    let owner = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;
    let res = client
        .get(format!("{}/api/admin/users", srv.base_url))
        .header("cookie", &owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;
    let res = client
        .get(format!("{}/api/admin/users", srv.base_url))
        .header("cookie", &root)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn cross_tenant_records_read_as_not_found() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let owner_a = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;
    let owner_b = login(&client, &srv.base_url, "owner-b@example.com", "owner-b-password").await;

    // Tenant A creates a contact.
    let res = client
        .post(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &owner_a)
        .json(&json!({ "name": "Acme Ltd", "type": "customer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["contact"]["id"].as_str().unwrap().to_string();

    // Tenant B probes it by id: reads and deletes both come back 404, not 403.
    let res = client
        .get(format!("{}/api/crm/contacts/{}", srv.base_url, id))
        .header("cookie", &owner_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/crm/contacts/{}", srv.base_url, id))
        .header("cookie", &owner_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // And tenant B's listing stays empty.
    let res = client
        .get(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &owner_b)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["contacts"].as_array().unwrap().is_empty());

    // The record survived the foreign delete attempt.
    let res = client
        .get(format!("{}/api/crm/contacts/{}", srv.base_url, id))
        .header("cookie", &owner_a)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn global_creates_require_an_explicit_tenant() {
    let services = Arc::new(AppServices::new());
    let (tenant_a, _) = seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    // No tenant named: rejected.
    let res = client
        .post(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &root)
        .json(&json!({ "name": "Orphan Co" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Tenant named explicitly: created inside it.
    let res = client
        .post(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &root)
        .json(&json!({ "name": "Placed Co", "tenant_id": tenant_a }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        created["contact"]["tenant_id"].as_str().unwrap(),
        tenant_a.to_string()
    );
}

#[tokio::test]
async fn owner_creates_ignore_client_supplied_tenants() {
    let services = Arc::new(AppServices::new());
    let (tenant_a, tenant_b) = seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let owner_a = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;

    // The payload tries to plant the record in tenant B.
    let res = client
        .post(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &owner_a)
        .json(&json!({ "name": "Sneaky Co", "tenant_id": tenant_b }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        created["contact"]["tenant_id"].as_str().unwrap(),
        tenant_a.to_string()
    );
}

#[tokio::test]
async fn me_reflects_the_session_and_logout_clears_it() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();

    // Without a session, /api/auth/me is reachable but reports 401.
    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&client, &srv.base_url, "staff-a@example.com", "staff-a-password").await;
    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "staff-a@example.com");

    // Logout instructs the client to drop the carrier.
    let res = client
        .post(format!("{}/api/auth/logout", srv.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let set_cookie = res.headers()[reqwest::header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn tampered_carriers_are_anonymous() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let cookie = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;

    // Flip the carrier's last character.
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let res = client
        .get(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn company_management_is_super_admin_only() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let owner = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;
    let res = client
        .get(format!("{}/api/admin/companies", srv.base_url))
        .header("cookie", &owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    // Create, then see it in the listing.
    let res = client
        .post(format!("{}/api/admin/companies", srv.base_url))
        .header("cookie", &root)
        .json(&json!({ "name": "Fresh Ventures", "industry": "retail" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/api/admin/companies", srv.base_url))
        .header("cookie", &root)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(
        body["companies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == id.as_str())
    );

    // Update and deactivate.
    let res = client
        .put(format!("{}/api/admin/companies/{}", srv.base_url, id))
        .header("cookie", &root)
        .json(&json!({ "name": "Fresh Ventures Ltd", "active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["company"]["name"], "Fresh Ventures Ltd");
    assert_eq!(body["company"]["active"], false);

    // Name cannot be created blank.
    let res = client
        .post(format!("{}/api/admin/companies", srv.base_url))
        .header("cookie", &root)
        .json(&json!({ "industry": "retail" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_company_purges_its_records() {
    let services = Arc::new(AppServices::new());
    let (tenant_a, _) = seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let owner_a = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;
    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    let res = client
        .post(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &owner_a)
        .json(&json!({ "name": "Doomed Co" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .delete(format!("{}/api/admin/companies/{}", srv.base_url, tenant_a))
        .header("cookie", &root)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The tenant's data went with the registration.
    let res = client
        .get(format!("{}/api/crm/contacts", srv.base_url))
        .header("cookie", &owner_a)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["contacts"].as_array().unwrap().is_empty());

    // Deleting it again is a 404.
    let res = client
        .delete(format!("{}/api/admin/companies/{}", srv.base_url, tenant_a))
        .header("cookie", &root)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn accounts_cannot_point_at_unregistered_tenants() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    let res = client
        .post(format!("{}/api/admin/users", srv.base_url))
        .header("cookie", &root)
        .json(&json!({
            "email": "orphan@example.com",
            "password": "orphan-password",
            "name": "Orphan",
            "role": "staff",
            "tenant_id": TenantId::new()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attendance_follows_the_hr_grant_and_tenant_scope() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();

    // CRM-only staff cannot touch attendance.
    let staff = login(&client, &srv.base_url, "staff-a@example.com", "staff-a-password").await;
    let res = client
        .get(format!("{}/api/hr/attendance", srv.base_url))
        .header("cookie", &staff)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let owner_a = login(&client, &srv.base_url, "owner-a@example.com", "owner-a-password").await;
    let owner_b = login(&client, &srv.base_url, "owner-b@example.com", "owner-b-password").await;

    // Owner A hires someone and logs a day.
    let res = client
        .post(format!("{}/api/hr/employees", srv.base_url))
        .header("cookie", &owner_a)
        .json(&json!({ "name": "Worker One" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let employee_id = created["employee"]["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/api/hr/attendance", srv.base_url))
        .header("cookie", &owner_a)
        .json(&json!({
            "employee_id": employee_id,
            "date": "2026-08-03T08:00:00Z",
            "status": "present"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Tenant B cannot log against tenant A's employee, and sees no entries.
    let res = client
        .post(format!("{}/api/hr/attendance", srv.base_url))
        .header("cookie", &owner_b)
        .json(&json!({
            "employee_id": employee_id,
            "date": "2026-08-03T08:00:00Z",
            "status": "present"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/api/hr/attendance", srv.base_url))
        .header("cookie", &owner_b)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["attendance"].as_array().unwrap().is_empty());

    // The month/year filter selects the logged day.
    let res = client
        .get(format!(
            "{}/api/hr/attendance?employee_id={}&month=8&year=2026",
            srv.base_url, employee_id
        ))
        .header("cookie", &owner_a)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["attendance"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!(
            "{}/api/hr/attendance?month=9&year=2026",
            srv.base_url
        ))
        .header("cookie", &owner_a)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["attendance"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn super_admin_account_creation_forces_all_modules() {
    let services = Arc::new(AppServices::new());
    seed_world(&services);
    let srv = TestServer::spawn(services).await;

    let client = reqwest::Client::new();
    let root = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    // Submit a super-admin with an empty grant set; it must come back full.
    let res = client
        .post(format!("{}/api/admin/users", srv.base_url))
        .header("cookie", &root)
        .json(&json!({
            "email": "second-root@example.com",
            "password": "second-root-password",
            "name": "Second Root",
            "role": "super-admin",
            "modules": { "crm": false, "hr": false, "inventory": false, "sales": false }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/api/admin/users", srv.base_url))
        .header("cookie", &root)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let user = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "second-root@example.com")
        .expect("created account missing from listing");
    for module in ["crm", "hr", "inventory", "sales"] {
        assert_eq!(user["modules"][module], true, "{module}");
    }
}
