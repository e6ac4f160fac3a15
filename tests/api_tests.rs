// tests/api_tests.rs

mod common;

use common::{signup_and_login, spawn_app, unique_email};

#[tokio::test]
async fn unknown_path_is_404() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn signup_returns_user_without_password() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();

    let response = client
        .post(format!("{}/api/signup", app.address))
        .json(&serde_json::json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": email,
            "password": "password123",
            "confirm_password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();

    signup_and_login(&client, &app.address, &email, "password123").await;

    let response = client
        .post(format!("{}/api/signup", app.address))
        .json(&serde_json::json!({
            "firstname": "Again",
            "lastname": "User",
            "email": email.to_uppercase(),
            "password": "password123",
            "confirm_password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email_alike() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let email = unique_email();

    signup_and_login(&client, &app.address, &email, "password123").await;

    let wrong_password = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "nope1234" }))
        .send()
        .await
        .unwrap();
    let unknown = client
        .post(format!("{}/api/login", app.address))
        .json(&serde_json::json!({ "email": unique_email(), "password": "nope1234" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown.status().as_u16(), 401);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn courses_filter_by_category() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let category = format!("cat_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

    let course_id: i64 = sqlx::query_scalar(
        "INSERT INTO courses (title, category, description) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Equity Derivatives")
    .bind(&category)
    .bind("Intro course")
    .fetch_one(&app.pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO course_videos (course_id, title, video_url, position) VALUES ($1, $2, $3, 1)")
        .bind(course_id)
        .bind("Lesson 1")
        .bind("https://videos.example.com/1")
        .execute(&app.pool)
        .await
        .unwrap();

    let courses: Vec<serde_json::Value> = client
        .get(format!("{}/api/courses?category={}", app.address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["id"], course_id);

    let videos: Vec<serde_json::Value> = client
        .get(format!("{}/api/course-videos", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(videos.iter().any(|v| {
        v["course_id"] == course_id
            && v["course_title"] == "Equity Derivatives"
            && v["video_title"] == "Lesson 1"
    }));
}
