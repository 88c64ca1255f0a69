use async_trait::async_trait;
use backend::{
    auth::{CredentialVerifier, SessionResolver},
    axum_http::{http_serve, routers::InvoiceState},
    usecases::invoices::InvoiceUseCase,
};
use chrono::{NaiveDate, Utc};
use crates::domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity, UpdateInvoiceEntity},
    repositories::{invoices::InvoiceRepository, sessions::SessionRepository},
    value_objects::{enums::invoice_statuses::InvoiceStatus, identity::OwnerScope},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{
    Method, RequestBuilder, StatusCode,
    header::{AUTHORIZATION, COOKIE},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

const PRIVATE_KEY: &str = include_str!("fixtures/private.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/public.pem");
const SESSION_COOKIE: &str = "authjs.session-token";

#[derive(Default)]
struct InMemoryInvoices {
    rows: Mutex<HashMap<String, InvoiceEntity>>,
}

impl InMemoryInvoices {
    fn insert(&self, invoice: InvoiceEntity) {
        self.rows
            .lock()
            .unwrap()
            .insert(invoice.id.clone(), invoice);
    }

    fn get(&self, invoice_id: &str) -> Option<InvoiceEntity> {
        self.rows.lock().unwrap().get(invoice_id).cloned()
    }
}

fn owned<'a>(
    rows: &'a mut HashMap<String, InvoiceEntity>,
    invoice_id: &str,
    scope: &OwnerScope,
) -> Option<&'a mut InvoiceEntity> {
    rows.get_mut(invoice_id).filter(|invoice| {
        scope.permits(
            invoice.owner_session_id.as_deref(),
            invoice.owner_mobile_id.as_deref(),
        )
    })
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> anyhow::Result<InvoiceEntity> {
        let entity = InvoiceEntity {
            id: invoice.id,
            owner_session_id: invoice.owner_session_id,
            owner_mobile_id: invoice.owner_mobile_id,
            client_name: invoice.client_name,
            client_email: invoice.client_email,
            client_address: invoice.client_address,
            from_name: invoice.from_name,
            from_email: invoice.from_email,
            from_address: invoice.from_address,
            currency: invoice.currency,
            date: invoice.date,
            due_date: invoice.due_date,
            invoice_name: invoice.invoice_name,
            invoice_number: invoice.invoice_number,
            invoice_item_description: invoice.invoice_item_description,
            invoice_item_quantity: invoice.invoice_item_quantity,
            invoice_item_rate: invoice.invoice_item_rate,
            note: invoice.note,
            total: invoice.total,
            status: invoice.status,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        };
        self.insert(entity.clone());
        Ok(entity)
    }

    async fn find_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
    ) -> anyhow::Result<Option<InvoiceEntity>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(owned(&mut rows, &invoice_id, &scope).cloned())
    }

    async fn update_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        changes: UpdateInvoiceEntity,
    ) -> anyhow::Result<Option<InvoiceEntity>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(invoice) = owned(&mut rows, &invoice_id, &scope) else {
            return Ok(None);
        };

        invoice.client_name = changes.client_name;
        invoice.client_email = changes.client_email;
        invoice.client_address = changes.client_address;
        invoice.from_name = changes.from_name;
        invoice.from_email = changes.from_email;
        invoice.from_address = changes.from_address;
        invoice.currency = changes.currency;
        invoice.date = changes.date;
        invoice.due_date = changes.due_date;
        invoice.invoice_name = changes.invoice_name;
        invoice.invoice_number = changes.invoice_number;
        invoice.invoice_item_description = changes.invoice_item_description;
        invoice.invoice_item_quantity = changes.invoice_item_quantity;
        invoice.invoice_item_rate = changes.invoice_item_rate;
        if let Some(note) = changes.note {
            invoice.note = note;
        }
        invoice.total = changes.total;
        if let Some(status) = changes.status {
            invoice.status = status;
        }
        invoice.updated_at = changes.updated_at;

        Ok(Some(invoice.clone()))
    }

    async fn update_status_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        status: InvoiceStatus,
    ) -> anyhow::Result<Option<InvoiceEntity>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(owned(&mut rows, &invoice_id, &scope).map(|invoice| {
            invoice.status = status.to_string();
            invoice.updated_at = Utc::now();
            invoice.clone()
        }))
    }

    async fn delete_owned(&self, invoice_id: String, scope: OwnerScope) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        if owned(&mut rows, &invoice_id, &scope).is_none() {
            return Ok(false);
        }
        Ok(rows.remove(&invoice_id).is_some())
    }
}

struct StaticSessions(HashMap<String, String>);

#[async_trait]
impl SessionRepository for StaticSessions {
    async fn find_active_user_id(&self, session_token: String) -> anyhow::Result<Option<String>> {
        Ok(self.0.get(&session_token).cloned())
    }
}

struct Harness {
    base_url: String,
    client: reqwest::Client,
    store: Arc<InMemoryInvoices>,
}

impl Harness {
    async fn start() -> Self {
        let store = Arc::new(InMemoryInvoices::default());
        let sessions = StaticSessions(HashMap::from([(
            "tok-web-1".to_string(),
            "web-1".to_string(),
        )]));

        let state = InvoiceState {
            usecase: Arc::new(InvoiceUseCase::new(Arc::clone(&store), "PHP".to_string())),
            verifier: Arc::new(CredentialVerifier::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap()),
            session_resolver: Arc::new(SessionResolver::new(
                Arc::new(sessions),
                SESSION_COOKIE.to_string(),
            )),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = http_serve::app(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            store,
        }
    }

    fn request(&self, method: &str, path: &str) -> RequestBuilder {
        let method = Method::from_bytes(method.as_bytes()).unwrap();
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    fn bearer_request(
        &self,
        method: &str,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> RequestBuilder {
        let request = self
            .request(method, path)
            .header(AUTHORIZATION, format!("Bearer {token}"));

        match body {
            Some(body) => request.json(&body),
            None => request,
        }
    }

    fn session_request(
        &self,
        method: &str,
        path: &str,
        session_token: Option<&str>,
        body: Option<Value>,
    ) -> RequestBuilder {
        let mut request = self.request(method, path);
        if let Some(session_token) = session_token {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={session_token}"));
        }

        match body {
            Some(body) => request.json(&body),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> (StatusCode, Value) {
        let response = request.send().await.unwrap();
        let status = response.status();
        let bytes = response.bytes().await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn stored_invoice(
    id: &str,
    owner_session_id: Option<&str>,
    owner_mobile_id: Option<&str>,
) -> InvoiceEntity {
    let created_at = Utc::now();
    InvoiceEntity {
        id: id.to_string(),
        owner_session_id: owner_session_id.map(str::to_string),
        owner_mobile_id: owner_mobile_id.map(str::to_string),
        client_name: "Old Client".to_string(),
        client_email: "old@client.test".to_string(),
        client_address: "Old Street".to_string(),
        from_name: "Old Issuer".to_string(),
        from_email: "old@issuer.test".to_string(),
        from_address: "Old Avenue".to_string(),
        currency: "PHP".to_string(),
        date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        due_date: 7,
        invoice_name: "OLD-1".to_string(),
        invoice_number: 99,
        invoice_item_description: "Old item".to_string(),
        invoice_item_quantity: 1,
        invoice_item_rate: 5.0,
        note: Some("old note".to_string()),
        total: 5.0,
        status: "PENDING".to_string(),
        created_at,
        updated_at: created_at,
    }
}

fn token(id: &str, user_id: Option<&str>) -> String {
    let mut claims = json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "exp": Utc::now().timestamp() + 3600,
    });
    if let Some(user_id) = user_id {
        claims["userId"] = json!(user_id);
    }

    encode(
        &Header::new(Algorithm::RS256),
        &claims,
        &EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap(),
    )
    .unwrap()
}

fn example_payload() -> Value {
    json!({
        "invoiceName": "INV-1",
        "total": "150.00",
        "status": "PENDING",
        "date": "2024-01-01",
        "dueDate": "30",
        "invoiceNumber": "1",
        "invoiceItemQuantity": "2",
        "invoiceItemRate": "75.00",
        "invoiceItemDescription": "Design work",
        "fromName": "Acme",
        "fromEmail": "billing@acme.test",
        "fromAddress": "1 Main St",
        "clientName": "Globex",
        "clientEmail": "ap@globex.test",
        "clientAddress": "2 Side St",
        "currency": "PHP",
        "note": "Thanks!"
    })
}

#[tokio::test]
async fn owner_put_replaces_the_invoice_and_non_owner_gets_404() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));

    let (status, body) = harness
        .send(harness.bearer_request(
            "PUT",
            "/api/invoices/inv_1",
            &token("mob-1", None),
            Some(example_payload()),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(150.0));
    assert_eq!(body["status"], json!("PENDING"));
    assert_eq!(body["invoiceName"], json!("INV-1"));

    let (status, body) = harness
        .send(harness.bearer_request(
            "PUT",
            "/api/invoices/inv_1",
            &token("mob-2", Some("web-2")),
            Some(example_payload()),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Invoice not found or no permission" }));
}

#[tokio::test]
async fn full_update_replaces_commercial_fields_and_keeps_ownership() {
    let harness = Harness::start().await;
    let original = stored_invoice("inv_1", Some("web-1"), Some("mob-1"));
    harness.store.insert(original.clone());

    let mut payload = example_payload();
    payload["ownerSessionId"] = json!("attacker");
    payload["ownerMobileId"] = json!("attacker");
    payload["id"] = json!("inv_other");

    let (status, _) = harness
        .send(harness.bearer_request(
            "PUT",
            "/api/invoices/inv_1",
            &token("mob-1", None),
            Some(payload),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = harness.store.get("inv_1").unwrap();
    assert_eq!(stored.owner_session_id.as_deref(), Some("web-1"));
    assert_eq!(stored.owner_mobile_id.as_deref(), Some("mob-1"));
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.client_name, "Globex");
    assert_eq!(stored.client_email, "ap@globex.test");
    assert_eq!(stored.client_address, "2 Side St");
    assert_eq!(stored.from_name, "Acme");
    assert_eq!(stored.from_email, "billing@acme.test");
    assert_eq!(stored.from_address, "1 Main St");
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(stored.due_date, 30);
    assert_eq!(stored.invoice_name, "INV-1");
    assert_eq!(stored.invoice_number, 1);
    assert_eq!(stored.invoice_item_description, "Design work");
    assert_eq!(stored.invoice_item_quantity, 2);
    assert_eq!(stored.invoice_item_rate, 75.0);
    assert_eq!(stored.note.as_deref(), Some("Thanks!"));
    assert_eq!(stored.total, 150.0);
    assert!(harness.store.get("inv_other").is_none());
}

#[tokio::test]
async fn linked_web_account_in_token_grants_access() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_web", Some("web-1"), None));

    let (status, body) = harness
        .send(harness.bearer_request(
            "GET",
            "/api/invoices/inv_web",
            &token("mob-9", Some("web-1")),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("inv_web"));

    let (status, _) = harness
        .send(harness.bearer_request(
            "GET",
            "/api/invoices/inv_web",
            &token("mob-9", None),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_total_is_rejected_without_mutation() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));
    let bearer = token("mob-1", None);

    let mut payload = example_payload();
    payload["total"] = json!("abc");

    let (status, body) = harness
        .send(harness.bearer_request("PUT", "/api/invoices/inv_1", &bearer, Some(payload)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid total value" }));

    let (status, body) = harness
        .send(harness.bearer_request("GET", "/api/invoices/inv_1", &bearer, None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(5.0));
    assert_eq!(body["invoiceName"], json!("OLD-1"));
}

#[tokio::test]
async fn missing_invoice_name_is_a_400() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));

    let mut payload = example_payload();
    payload.as_object_mut().unwrap().remove("invoiceName");

    let (status, body) = harness
        .send(harness.bearer_request(
            "PUT",
            "/api/invoices/inv_1",
            &token("mob-1", None),
            Some(payload),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invoiceName is required" }));
}

#[tokio::test]
async fn non_owner_gets_404_even_with_an_invalid_payload() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));
    let stranger = token("mob-2", None);

    let (status, _) = harness
        .send(harness.bearer_request(
            "PUT",
            "/api/invoices/inv_1",
            &stranger,
            Some(json!({ "total": "abc" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = harness
        .send(harness.bearer_request(
            "PATCH",
            "/api/invoices/inv_1",
            &stranger,
            Some(json!({ "status": "BOGUS" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Invoice not found or no permission" })
    );
}

#[tokio::test]
async fn patch_status_round_trips_between_paid_and_pending() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));
    let bearer = token("mob-1", None);

    let (status, body) = harness
        .send(harness.bearer_request(
            "PATCH",
            "/api/invoices/inv_1",
            &bearer,
            Some(json!({ "status": "PAID" })),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Invoice status updated successfully" })
    );
    assert_eq!(harness.store.get("inv_1").unwrap().status, "PAID");

    let (status, _) = harness
        .send(harness.bearer_request(
            "PATCH",
            "/api/invoices/inv_1",
            &bearer,
            Some(json!({ "status": "PENDING" })),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.store.get("inv_1").unwrap().status, "PENDING");
}

#[tokio::test]
async fn patch_rejects_missing_and_unknown_status() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));
    let bearer = token("mob-1", None);

    let (status, body) = harness
        .send(harness.bearer_request("PATCH", "/api/invoices/inv_1", &bearer, Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "status is required" }));

    let (status, body) = harness
        .send(harness.bearer_request(
            "PATCH",
            "/api/invoices/inv_1",
            &bearer,
            Some(json!({ "status": "paid" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Invalid status value" }));
    assert_eq!(harness.store.get("inv_1").unwrap().status, "PENDING");
}

#[tokio::test]
async fn delete_succeeds_once_then_404s() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));
    let bearer = token("mob-1", None);

    let (status, body) = harness
        .send(harness.bearer_request("DELETE", "/api/invoices/inv_1", &bearer, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert!(harness.store.get("inv_1").is_none());

    let (status, _) = harness
        .send(harness.bearer_request("DELETE", "/api/invoices/inv_1", &bearer, None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_failures_are_uniform_401s() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", None, Some("mob-1")));

    let (status, body) = harness
        .send(harness.request("DELETE", "/api/invoices/inv_1"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid or expired token" }));

    let expired = encode(
        &Header::new(Algorithm::RS256),
        &json!({ "id": "mob-1", "exp": 1 }),
        &EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap(),
    )
    .unwrap();
    let (status, body) = harness
        .send(harness.bearer_request(
            "PATCH",
            "/api/invoices/inv_1",
            &expired,
            Some(json!({ "status": "PAID" })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Invalid or expired token" })
    );
    assert!(harness.store.get("inv_1").is_some());
}

#[tokio::test]
async fn mobile_create_is_owned_by_the_token_id() {
    let harness = Harness::start().await;

    let (status, body) = harness
        .send(harness.bearer_request(
            "POST",
            "/api/invoices",
            &token("mob-1", Some("web-1")),
            Some(example_payload()),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ownerMobileId"], json!("mob-1"));
    assert_eq!(body["ownerSessionId"], Value::Null);
    assert_eq!(body["currency"], json!("PHP"));

    let id = body["id"].as_str().unwrap();
    assert!(harness.store.get(id).is_some());
}

#[tokio::test]
async fn dashboard_session_flow() {
    let harness = Harness::start().await;

    let (status, body) = harness
        .send(harness.session_request(
            "POST",
            "/dashboard/invoices",
            Some("tok-web-1"),
            Some(example_payload()),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ownerSessionId"], json!("web-1"));
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = harness
        .send(harness.session_request(
            "POST",
            &format!("/dashboard/invoices/{id}/paid"),
            Some("tok-web-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Invoice marked as paid" }));
    assert_eq!(harness.store.get(&id).unwrap().status, "PAID");

    let (status, body) = harness
        .send(harness.session_request(
            "GET",
            &format!("/dashboard/invoices/{id}"),
            Some("tok-web-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("PAID"));

    let (status, _) = harness
        .send(harness.session_request(
            "DELETE",
            &format!("/dashboard/invoices/{id}"),
            Some("tok-web-1"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(harness.store.get(&id).is_none());
}

#[tokio::test]
async fn dashboard_requires_an_active_session() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_1", Some("web-1"), None));

    let (status, body) = harness
        .send(harness.session_request("GET", "/dashboard/invoices/inv_1", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, _) = harness
        .send(harness.session_request(
            "GET",
            "/dashboard/invoices/inv_1",
            Some("tok-unknown"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A bearer token is not a session.
    let (status, _) = harness
        .send(harness.bearer_request(
            "GET",
            "/dashboard/invoices/inv_1",
            &token("mob-1", Some("web-1")),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_caller_cannot_touch_mobile_only_invoices() {
    let harness = Harness::start().await;
    harness.store.insert(stored_invoice("inv_mob", None, Some("web-1")));

    let (status, _) = harness
        .send(harness.session_request(
            "PUT",
            "/dashboard/invoices/inv_mob",
            Some("tok-web-1"),
            Some(example_payload()),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(harness.store.get("inv_mob").unwrap().invoice_name, "OLD-1");
}

#[tokio::test]
async fn health_check_and_fallback() {
    let harness = Harness::start().await;

    let response = harness
        .request("GET", "/api/health-check")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");

    let (status, _) = harness.send(harness.request("GET", "/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
