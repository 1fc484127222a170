mod support;

use api::{Method, ProfileMethod};
use common::KeyValueStore;
use rust_decimal::Decimal;
use serde_json::json;
use tracker::{Decision, NotificationKind, ProfileForm, RegisterForm, ServiceError, Submission};

use crate::support::{
    Harness, MockReply, TOKEN, USER_ID, echo_decision, expense_json, suggestion_json,
};

const VERIFY_PATH: &str = "/ml/verificar-categoria";
const DECISION_PATH: &str = "/gastos/crear-con-decision";

#[tokio::test]
async fn test_matching_category_creates_immediately() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("food", "food"));
    echo_decision(&harness.transport, 11);

    let submission = harness
        .state
        .expenses
        .submit("Pizza", "20", "food")
        .await
        .unwrap();

    let Submission::Created(expense) = submission else {
        panic!("expected the expense to be created");
    };
    assert_eq!(expense.id, 11);
    assert_eq!(expense.category, "food");

    let creates = harness.transport.calls_to(DECISION_PATH);
    assert_eq!(creates.len(), 1);
    let body = creates[0].body.clone().unwrap();
    assert_eq!(body["acepta_sugerencia"], json!(true));
    assert_eq!(creates[0].bearer.as_deref(), Some(TOKEN));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, NotificationKind::ExpenseCreatedWithDecision);
    assert_eq!(log[1].kind, NotificationKind::CategoryVerification);
}

#[tokio::test]
async fn test_differing_category_waits_for_decision() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("misc", "food"));
    echo_decision(&harness.transport, 12);

    let submission = harness
        .state
        .expenses
        .submit("Lunch", "12.50", "misc")
        .await
        .unwrap();

    let Submission::PendingDecision(pending) = submission else {
        panic!("expected a pending decision");
    };
    assert_eq!(pending.original_category(), "misc");
    assert_eq!(pending.suggested_category(), "food");
    assert_eq!(pending.amount(), Decimal::new(1250, 2));
    assert!(harness.transport.calls_to(DECISION_PATH).is_empty());

    let expense = harness
        .state
        .expenses
        .resume(pending, Decision::Accept)
        .await
        .unwrap();
    assert_eq!(expense.category, "food");

    let creates = harness.transport.calls_to(DECISION_PATH);
    assert_eq!(creates.len(), 1);
    let body = creates[0].body.clone().unwrap();
    assert_eq!(body["acepta_sugerencia"], json!(true));
    assert_eq!(body["categoria_original"], json!("misc"));
    assert_eq!(body["categoria_sugerida"], json!("food"));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::ExpenseCreatedWithDecision);
    assert!(log[0].message.contains("food - $12.50"));
}

#[tokio::test]
async fn test_ignored_suggestion_keeps_original_category() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("misc", "food"));
    echo_decision(&harness.transport, 13);

    let Submission::PendingDecision(pending) = harness
        .state
        .expenses
        .submit("Lunch", "12.50", "misc")
        .await
        .unwrap()
    else {
        panic!("expected a pending decision");
    };

    let expense = harness
        .state
        .expenses
        .resume(pending, Decision::Ignore)
        .await
        .unwrap();
    assert_eq!(expense.category, "misc");

    let body = harness.transport.calls_to(DECISION_PATH)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["acepta_sugerencia"], json!(false));
}

#[tokio::test]
async fn test_verification_failure_falls_back_to_chosen_category() {
    let harness = Harness::authenticated().await;
    harness.transport.fail(Method::POST, VERIFY_PATH);
    echo_decision(&harness.transport, 14);

    let submission = harness
        .state
        .expenses
        .submit("Taxi", "8", "transport")
        .await
        .unwrap();

    let Submission::Created(expense) = submission else {
        panic!("expected the expense to be created");
    };
    assert_eq!(expense.category, "transport");

    let body = harness.transport.calls_to(DECISION_PATH)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["acepta_sugerencia"], json!(false));
    assert_eq!(body["categoria_original"], json!("transport"));
    assert_eq!(body["categoria_sugerida"], json!("transport"));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, NotificationKind::ExpenseCreatedWithDecision);
    assert_eq!(log[1].kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_verification_http_error_also_falls_back() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::POST,
        VERIFY_PATH,
        503,
        json!({ "detail": "model unavailable" }),
    );
    echo_decision(&harness.transport, 15);

    let submission = harness
        .state
        .expenses
        .submit("Taxi", "8", "transport")
        .await
        .unwrap();
    assert!(matches!(submission, Submission::Created(_)));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[1].kind, NotificationKind::Error);
    assert_eq!(log[1].message, "Error 503: model unavailable");
    assert!(log[1].raw_response.contains("model unavailable"));
}

#[tokio::test]
async fn test_missing_token_makes_no_calls() {
    let harness = Harness::new().await;

    let result = harness.state.expenses.submit("Lunch", "12.50", "misc").await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let result = harness.state.expenses.list_all_expenses().await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let result = harness.state.expenses.delete_expense(3).await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let expenses = &harness.state.expenses;
    let result = expenses.register_expense("Bus", "2.5", "transport").await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let result = expenses.edit_expense(3, "Bus", "2.5", "transport").await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let result = expenses.list_expenses_by_category("food").await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let result = expenses.list_expenses_by_user_category("food", 10).await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    let form = ProfileForm {
        name: "Ana".to_string(),
        phone: String::new(),
        budget: String::new(),
        budget_period: "monthly".to_string(),
    };
    let result = expenses.update_profile(&form, ProfileMethod::Put).await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));

    assert_eq!(harness.transport.call_count(), 0);
    assert!(harness.state.notifications.snapshot().is_empty());
}

#[tokio::test]
async fn test_resume_after_logout_makes_no_calls() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("misc", "food"));
    echo_decision(&harness.transport, 17);

    let Submission::PendingDecision(pending) = harness
        .state
        .expenses
        .submit("Lunch", "12.50", "misc")
        .await
        .unwrap()
    else {
        panic!("expected a pending decision");
    };
    harness.state.expenses.logout().await.unwrap();
    let calls_before = harness.transport.call_count();

    let result = harness
        .state
        .expenses
        .resume(pending, Decision::Accept)
        .await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));
    assert_eq!(harness.transport.call_count(), calls_before);
    assert!(harness.transport.calls_to(DECISION_PATH).is_empty());
}

#[tokio::test]
async fn test_each_pending_decision_creates_one_expense() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("misc", "food"));
    echo_decision(&harness.transport, 18);

    let mut handles = Vec::new();
    for description in ["Lunch", "Dinner"] {
        match harness
            .state
            .expenses
            .submit(description, "12.50", "misc")
            .await
            .unwrap()
        {
            Submission::PendingDecision(pending) => handles.push(pending),
            Submission::Created(_) => panic!("expected a pending decision"),
        }
    }

    for pending in handles {
        harness
            .state
            .expenses
            .resume(pending, Decision::Ignore)
            .await
            .unwrap();
    }

    let creates = harness.transport.calls_to(DECISION_PATH);
    assert_eq!(creates.len(), 2);
    let descriptions: Vec<_> = creates
        .iter()
        .map(|call| call.body.clone().unwrap()["descripcion"].clone())
        .collect();
    assert_eq!(descriptions, vec![json!("Lunch"), json!("Dinner")]);
}

#[tokio::test]
async fn test_unreadable_success_body_is_recorded_raw() {
    let harness = Harness::authenticated().await;
    harness.transport.on(Method::GET, "/gastos/usuario", |_| {
        MockReply::Raw(200, "<html>maintenance</html>".to_string())
    });

    let error = harness
        .state
        .expenses
        .list_all_expenses()
        .await
        .unwrap_err();
    assert!(matches!(error, ServiceError::EmptyResponseBody));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::Error);
    assert_eq!(log[0].raw_response, "<html>maintenance</html>");
}

#[tokio::test]
async fn test_invalid_amount_is_rejected_before_any_call() {
    let harness = Harness::authenticated().await;

    let result = harness.state.expenses.submit("Lunch", "-3", "misc").await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn test_blank_description_uses_default() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("misc", "misc"));
    echo_decision(&harness.transport, 16);

    harness
        .state
        .expenses
        .submit("   ", "5", "misc")
        .await
        .unwrap();

    let check = harness.transport.calls_to(VERIFY_PATH)[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(check["descripcion"], json!("No description"));
}

#[tokio::test]
async fn test_create_failure_is_logged_and_returned() {
    let harness = Harness::authenticated().await;
    harness
        .transport
        .on_json(Method::POST, VERIFY_PATH, 200, suggestion_json("food", "food"));
    harness.transport.on_json(
        Method::POST,
        DECISION_PATH,
        422,
        json!({ "detail": [{ "msg": "monto must be positive" }] }),
    );

    let result = harness.state.expenses.submit("Pizza", "20", "food").await;
    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(422));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::Error);
    assert_eq!(log[0].message, "Error 422: monto must be positive");
}

#[tokio::test]
async fn test_register_expense_sends_user_id() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::POST,
        "/gastos",
        201,
        expense_json(20, "Bus", 2.5, "transport"),
    );

    let expense = harness
        .state
        .expenses
        .register_expense("Bus", "2.5", "transport")
        .await
        .unwrap();
    assert_eq!(expense.id, 20);

    let body = harness.transport.calls_to("/gastos")[0].body.clone().unwrap();
    assert_eq!(body["usuario_id"], json!(USER_ID.to_string()));
    assert_eq!(body["categoria"], json!("transport"));

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::ExpenseCreated);
}

#[tokio::test]
async fn test_edit_and_delete_expense() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::PUT,
        "/gastos/20",
        200,
        expense_json(20, "Bus pass", 30.0, "transport"),
    );
    harness.transport.on_json(
        Method::DELETE,
        "/gastos/20",
        200,
        json!({ "mensaje": "Gasto eliminado", "id": 20 }),
    );

    let edited = harness
        .state
        .expenses
        .edit_expense(20, "Bus pass", "30", "transport")
        .await
        .unwrap();
    assert_eq!(edited.description.as_deref(), Some("Bus pass"));

    let deleted = harness.state.expenses.delete_expense(20).await.unwrap();
    assert_eq!(deleted.id, Some(20));

    for call in harness.transport.calls_to("/gastos/20") {
        assert_eq!(
            call.query,
            vec![("usuario_id".to_string(), USER_ID.to_string())]
        );
    }

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::ExpenseDeleted);
    assert_eq!(log[0].message, "Gasto eliminado");
    assert_eq!(log[1].kind, NotificationKind::ExpenseEdited);
}

#[tokio::test]
async fn test_user_id_endpoints_need_stored_user_id() {
    let harness = Harness::new().await;
    harness
        .session_store
        .set("access_token", TOKEN)
        .await
        .unwrap();

    let result = harness
        .state
        .expenses
        .list_expenses_by_user_category("food", 10)
        .await;
    assert!(matches!(result, Err(ServiceError::AuthenticationRequired)));
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn test_listings() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::GET,
        "/gastos/usuario",
        200,
        json!([
            expense_json(1, "Pizza", 20.0, "food"),
            expense_json(2, "Taxi", 8.0, "transport")
        ]),
    );
    harness.transport.on_json(
        Method::GET,
        "/gastos/usuario/categoria/food",
        200,
        json!([expense_json(1, "Pizza", 20.0, "food")]),
    );
    harness.transport.on_json(
        Method::GET,
        &format!("/gastos/usuario/{}/categoria/food", USER_ID),
        200,
        json!([expense_json(1, "Pizza", 20.0, "food")]),
    );

    let all = harness.state.expenses.list_all_expenses().await.unwrap();
    assert_eq!(all.len(), 2);

    let food = harness
        .state
        .expenses
        .list_expenses_by_category("food")
        .await
        .unwrap();
    assert_eq!(food.len(), 1);

    let limited = harness
        .state
        .expenses
        .list_expenses_by_user_category("food", 5)
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    let call = harness
        .transport
        .calls_to(&format!("/gastos/usuario/{}/categoria/food", USER_ID))
        .remove(0);
    assert_eq!(call.query, vec![("limite".to_string(), "5".to_string())]);

    let log = harness.state.notifications.snapshot();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|n| n.kind == NotificationKind::Success));
}

#[tokio::test]
async fn test_listing_failure_is_logged() {
    let harness = Harness::authenticated().await;
    harness.transport.on(Method::GET, "/gastos/usuario", |_| {
        MockReply::Raw(500, "Internal Server Error".to_string())
    });

    let error = harness
        .state
        .expenses
        .list_all_expenses()
        .await
        .unwrap_err();
    assert_eq!(error.user_message(), "Server error (status 500)");

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::Error);
    assert_eq!(log[0].message, "Error 500: Internal Server Error");
    assert_eq!(log[0].raw_response, "Internal Server Error");
}

#[tokio::test]
async fn test_login_saves_session() {
    let harness = Harness::new().await;
    harness.transport.on_json(
        Method::POST,
        "/auth/login-json",
        200,
        json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "user_id": 9
        }),
    );

    let user_id = harness
        .state
        .expenses
        .login(" ana@example.com ", "secret")
        .await
        .unwrap();
    assert_eq!(user_id, 9);
    assert_eq!(
        harness.state.session.access_token().await.unwrap(),
        Some("fresh-token".to_string())
    );
    assert_eq!(harness.state.session.user_id().await.unwrap(), Some(9));
    assert!(harness.transport.calls()[0].bearer.is_none());
    assert!(harness.state.notifications.snapshot().is_empty());
}

#[tokio::test]
async fn test_login_rejections() {
    let harness = Harness::new().await;
    harness.transport.on_json(
        Method::POST,
        "/auth/login-json",
        401,
        json!({ "detail": "Credenciales incorrectas" }),
    );

    let error = harness
        .state
        .expenses
        .login("ana@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(401));
    assert_eq!(harness.state.session.access_token().await.unwrap(), None);

    let error = harness
        .state
        .expenses
        .login("not-an-email", "secret")
        .await
        .unwrap_err();
    assert!(matches!(error, ServiceError::Validation(_)));
    assert_eq!(harness.transport.call_count(), 1);
}

#[tokio::test]
async fn test_register_and_logout() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::POST,
        "/auth/register",
        201,
        json!({
            "id": 5,
            "nombre": "Ana",
            "email": "ana@example.com",
            "telefono": null,
            "presupuesto": 300.0,
            "periodo_presupuesto": "mensual"
        }),
    );

    let form = RegisterForm {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "long enough".to_string(),
        phone: String::new(),
        budget: "300".to_string(),
        budget_period: "monthly".to_string(),
    };
    let profile = harness.state.expenses.register(&form).await.unwrap();
    assert_eq!(profile.id, 5);

    let body = harness.transport.calls_to("/auth/register")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["periodo_presupuesto"], json!("mensual"));

    harness.state.expenses.logout().await.unwrap();
    assert_eq!(harness.state.session.access_token().await.unwrap(), None);
    assert!(harness.session_store.is_empty().await);
}

#[tokio::test]
async fn test_update_profile_caches_snapshot() {
    let harness = Harness::authenticated().await;
    harness.transport.on_json(
        Method::PUT,
        "/perfil",
        200,
        json!({
            "id": USER_ID,
            "nombre": "Ana Maria",
            "email": "ana@example.com",
            "telefono": "3001234567",
            "presupuesto": 70.0,
            "periodo_presupuesto": "semanal"
        }),
    );

    let form = ProfileForm {
        name: "Ana Maria".to_string(),
        phone: "3001234567".to_string(),
        budget: "70".to_string(),
        budget_period: "weekly".to_string(),
    };
    let profile = harness
        .state
        .expenses
        .update_profile(&form, ProfileMethod::Put)
        .await
        .unwrap();
    assert_eq!(profile.name, "Ana Maria");
    assert_eq!(
        harness.state.expenses.current_profile().await.unwrap(),
        Some(profile)
    );

    let log = harness.state.notifications.snapshot();
    assert_eq!(log[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_invalid_profile_form_is_rejected() {
    let harness = Harness::authenticated().await;
    let form = ProfileForm {
        name: "Ana".to_string(),
        phone: "123".to_string(),
        budget: String::new(),
        budget_period: "monthly".to_string(),
    };

    let result = harness
        .state
        .expenses
        .update_profile(&form, ProfileMethod::Post)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert_eq!(harness.transport.call_count(), 0);
}
