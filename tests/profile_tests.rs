// tests/profile_tests.rs

mod common;

use common::{signup_and_login, spawn_app, unique_email};

#[tokio::test]
async fn edit_profile_updates_and_sanitizes_bio() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();
    let (_, token) = signup_and_login(&client, &app.address, &email, "password123").await;

    let response = client
        .put(format!("{}/api/edit-profile", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "firstname": "Grace",
            "lastname": "Hopper",
            "email": email,
            "phone_number": "555-0100",
            "dob": "1906-12-09",
            "bio": "<b>Admiral</b><script>alert(1)</script>"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["first_name"], "Grace");
    assert_eq!(body["user"]["dob"], "1906-12-09");
    assert_eq!(body["user"]["bio"], "<b>Admiral</b>");
}

#[tokio::test]
async fn change_password_checks_current_password() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();
    let (_, token) = signup_and_login(&client, &app.address, &email, "password123").await;

    let wrong = client
        .put(format!("{}/api/change-password", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "currentPassword": "nope", "newPassword": "newpass456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status().as_u16(), 401);

    let ok = client
        .put(format!("{}/api/change-password", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "currentPassword": "password123", "newPassword": "newpass456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);

    let old_login = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(old_login.status().as_u16(), 401);

    let new_login = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "newpass456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(new_login.status().as_u16(), 200);
}

#[tokio::test]
async fn delete_profile_removes_account() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();
    let (_, token) = signup_and_login(&client, &app.address, &email, "password123").await;

    let first = client
        .delete(format!("{}/api/delete-profile", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 200);

    // Token still verifies, but the user row is gone
    let second = client
        .delete(format!("{}/api/delete-profile", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 404);

    let login = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 401);
}

#[tokio::test]
async fn user_list_requires_admin_role() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();
    let (id, token) = signup_and_login(&client, &app.address, &email, "password123").await;

    let forbidden = client
        .get(format!("{}/api/get-all-users", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(id)
        .execute(&app.pool)
        .await
        .unwrap();

    // Role is read from the token, so log in again
    let login: serde_json::Value = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let admin_token = login["token"].as_str().unwrap();

    let users: Vec<serde_json::Value> = client
        .get(format!("{}/api/get-all-users", app.address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(users.iter().any(|u| u["id"] == id));
    assert!(users.iter().all(|u| u.get("password").is_none()));
}
