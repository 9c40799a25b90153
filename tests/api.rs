#![cfg(feature = "postgres-tests")]

mod common;

use axum::http::StatusCode;
use lectern::model::entity::UserEntity;
use serde_json::json;

use crate::common::{
    Action, Flow, create_action, create_user_action, get_stored_action, setup_server,
    setup_test_db, user_body,
};

#[tokio::test]
async fn route_user_create_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("jdoe", "jane@Example.com").assert_body(|body| {
            let ent: UserEntity = serde_json::from_value(body.clone()).expect("Invalid body format");
            assert_eq!(ent.username(), "jdoe");
            assert_eq!(ent.email(), "jane@example.com");
            assert!(body.get("password_hash").is_none());
            assert_eq!(body["is_active"], json!(true));
        }))
        // same username
        .step(
            create_user_action("jdoe", "other@example.com").with_expect(StatusCode::CONFLICT),
        )
        // same email, different case in the domain
        .step(
            create_user_action("jdoe2", "jane@EXAMPLE.COM").with_expect(StatusCode::CONFLICT),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_user_validation_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let mut body = user_body("bad name", "not-an-email");
    body["phone_number"] = json!("1234567890123456");

    Flow::new()
        .step(
            Action::new("invalid_user", "POST", "/api/v1/users")
                .with_body(body)
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    let errors = &body["errors"];
                    assert!(errors.get("username").is_some());
                    assert!(errors.get("email").is_some());
                    assert!(errors.get("phone_number").is_some());
                    assert_eq!(body["status_code"], json!("400"));
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_user_crud_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("jdoe", "jane@example.com").with_save_as("user"))
        .step(create_user_action("rroe", "rick@example.com"))
        .step(
            Action::new("page", "GET", "/api/v1/users")
                .with_param("limit", "1")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert_eq!(body["total"], json!(2));
                    assert_eq!(body["limit"], json!(1));
                    assert_eq!(body["items"].as_array().unwrap().len(), 1);
                }),
        )
        .step(
            Action::new("update", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("user")))
                .with_body(json!({
                    "username": "jane_doe",
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "email": "jane@example.com",
                    "phone_number": "+15550100",
                    "date_of_birth": "1990-05-17",
                    "is_staff": true
                }))
                .assert_body(|body| {
                    assert_eq!(body["username"], json!("jane_doe"));
                    assert_eq!(body["is_staff"], json!(true));
                }),
        )
        .step(get_stored_action("display", "users", "user", "/display").assert_body(|body| {
            assert_eq!(body["display"], json!("jane_doe"));
        }))
        .step(
            Action::new("delete", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/users/{}", ctx.id("user"))),
        )
        .step(get_stored_action("get_deleted", "users", "user", "").with_expect(StatusCode::NOT_FOUND))
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_course_flow_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(create_user_action("prof", "prof@example.com").with_save_as("prof_user"))
        .step(create_user_action("jdoe", "jane@example.com").with_save_as("student_user"))
        .step(
            create_action("lecturer", "/api/v1/lecturers", |ctx| {
                json!({ "user_id": ctx.id("prof_user"), "bio": "Systems person" })
            })
            .with_save_as("lecturer")
            .assert_body(|body| {
                assert_eq!(body["profile_picture"], json!("Display_pics/name_of_pics.jpg"));
            }),
        )
        .step(
            create_action("student", "/api/v1/students", |ctx| {
                json!({ "user_id": ctx.id("student_user"), "intended": "Backend" })
            })
            .with_save_as("student"),
        )
        .step(
            create_action("course", "/api/v1/courses", |ctx| {
                json!({
                    "title": "Rust for Beginners",
                    "description": "From zero to borrow checker",
                    "image": "cover.png",
                    "created_by": ctx.id("lecturer"),
                })
            })
            .with_save_as("course")
            .assert_body(|body| {
                assert_eq!(body["image"], json!("Display_pics/cover.png"));
            }),
        )
        .step(
            create_action("module", "/api/v1/modules", |ctx| {
                json!({
                    "course_id": ctx.id("course"),
                    "title": "Ownership",
                    "description": "Moves and borrows",
                    "resources": "ownership.pdf",
                    "order_index": 1,
                })
            })
            .with_save_as("module"),
        )
        // wrong handout format
        .step(
            create_action("bad_module", "/api/v1/modules", |ctx| {
                json!({
                    "course_id": ctx.id("course"),
                    "title": "Lifetimes",
                    "description": "",
                    "resources": "lifetimes.docx",
                    "order_index": 2,
                })
            })
            .with_expect(StatusCode::BAD_REQUEST)
            .assert_body(|body| {
                assert!(body["errors"].get("resources").is_some());
            }),
        )
        .step(create_action("lesson_2", "/api/v1/lessons", |ctx| {
            json!({
                "module_id": ctx.id("module"),
                "title": "Borrowing",
                "content": "# Borrowing",
                "order_index": 2,
            })
        }))
        .step(
            create_action("lesson_1", "/api/v1/lessons", |ctx| {
                json!({
                    "module_id": ctx.id("module"),
                    "title": "Moves",
                    "content": "# Moves",
                    "order_index": 1,
                })
            })
            .with_save_as("lesson"),
        )
        .step(
            create_action("video", "/api/v1/videos", |ctx| {
                json!({
                    "module_id": ctx.id("module"),
                    "title": "Intro",
                    "video": "intro.mp4",
                    "order_index": 1,
                })
            })
            .with_save_as("video"),
        )
        .step(
            create_action("enroll", "/api/v1/enrollments", |ctx| {
                json!({ "student_id": ctx.id("student"), "course_id": ctx.id("course") })
            })
            .with_save_as("enrollment"),
        )
        .step(
            create_action("like", "/api/v1/likes", |ctx| {
                json!({ "student_id": ctx.id("student"), "course_id": ctx.id("course") })
            })
            .with_save_as("like"),
        )
        .step(
            create_action("wish", "/api/v1/wishlists", |ctx| {
                json!({ "student_id": ctx.id("student"), "course_id": ctx.id("course") })
            })
            .with_save_as("wish"),
        )
        .step(
            create_action("quiz", "/api/v1/quizzes", |ctx| {
                json!({ "lesson_id": ctx.id("lesson"), "title": "Moves quiz" })
            })
            .with_save_as("quiz"),
        )
        .step(
            create_action("question", "/api/v1/questions", |ctx| {
                json!({
                    "quiz_id": ctx.id("quiz"),
                    "text": "Is a moved value usable?",
                    "order_index": 1,
                })
            })
            .with_save_as("question"),
        )
        .step(
            create_action("choice", "/api/v1/choices", |ctx| {
                json!({ "question_id": ctx.id("question"), "text": "No", "is_correct": true })
            })
            .with_save_as("choice"),
        )
        .step(
            create_action("result", "/api/v1/quiz-results", |ctx| {
                json!({ "student_id": ctx.id("student"), "quiz_id": ctx.id("quiz"), "score": "70.00" })
            })
            .with_save_as("result"),
        )
        .step(get_stored_action("like_display", "likes", "like", "/display").assert_body(|body| {
            assert_eq!(body["display"], json!("jdoe liked Rust for Beginners"));
        }))
        .step(get_stored_action("wish_display", "wishlists", "wish", "/display").assert_body(
            |body| {
                assert_eq!(body["display"], json!("jdoe added Rust for Beginners to wishlist"));
            },
        ))
        .step(
            get_stored_action("student_display", "students", "student", "/display").assert_body(
                |body| {
                    assert_eq!(body["display"], json!("jdoe"));
                },
            ),
        )
        .step(get_stored_action("quiz_display", "quizzes", "quiz", "/display").assert_body(|body| {
            assert_eq!(body["display"], json!("Moves quiz"));
        }))
        .step(
            get_stored_action("enrollment_display", "enrollments", "enrollment", "/display")
                .assert_body(|body| {
                    assert_eq!(body["display"], json!("jdoe enrolled in Rust for Beginners"));
                }),
        )
        .step(
            get_stored_action("lecturer_courses", "lecturers", "lecturer", "/courses")
                .assert_body(|body| {
                    assert_eq!(body.as_array().unwrap().len(), 1);
                }),
        )
        .step(
            get_stored_action("student_enrollments", "students", "student", "/enrollments")
                .assert_body(|body| {
                    assert_eq!(body.as_array().unwrap().len(), 1);
                }),
        )
        .step(
            get_stored_action("outline", "courses", "course", "/outline").assert_body(|body| {
                assert_eq!(body["title"], json!("Rust for Beginners"));
                assert_eq!(body["likes"], json!(1));

                let modules = body["modules"].as_array().unwrap();
                assert_eq!(modules.len(), 1);
                assert_eq!(modules[0]["resources"], json!("pdfs/ownership.pdf"));

                let lessons = modules[0]["lessons"].as_array().unwrap();
                assert_eq!(lessons[0]["title"], json!("Moves"));
                assert_eq!(lessons[1]["title"], json!("Borrowing"));

                let videos = modules[0]["videos"].as_array().unwrap();
                assert_eq!(videos[0]["video"], json!("videos/intro.mp4"));
            }),
        )
        .step(
            Action::new("delete_course", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id("course"))),
        )
        .step(
            get_stored_action("modules_of_deleted", "courses", "course", "/modules")
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            get_stored_action("enrollments_after_delete", "students", "student", "/enrollments")
                .assert_body(|body| {
                    assert!(body.as_array().unwrap().is_empty());
                }),
        )
        // everything under the course went with it
        .step(get_stored_action("gone_video", "videos", "video", "").with_expect(StatusCode::NOT_FOUND))
        .step(get_stored_action("gone_lesson", "lessons", "lesson", "").with_expect(StatusCode::NOT_FOUND))
        .step(get_stored_action("gone_quiz", "quizzes", "quiz", "").with_expect(StatusCode::NOT_FOUND))
        .step(
            get_stored_action("gone_question", "questions", "question", "")
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(get_stored_action("gone_choice", "choices", "choice", "").with_expect(StatusCode::NOT_FOUND))
        .step(
            get_stored_action("gone_result", "quiz-results", "result", "")
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(get_stored_action("gone_like", "likes", "like", "").with_expect(StatusCode::NOT_FOUND))
        .step(get_stored_action("gone_wish", "wishlists", "wish", "").with_expect(StatusCode::NOT_FOUND))
        .step(get_stored_action("student_kept", "students", "student", ""))
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_bad_reference_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("orphan_student", "POST", "/api/v1/students")
                .with_body(json!({
                    "user_id": uuid::Uuid::new_v4(),
                    "intended": "Nothing",
                }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("missing_course", "GET", &format!("/api/v1/courses/{}", uuid::Uuid::new_v4()))
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| {
                    assert_eq!(body["message"], json!("Resource error, resource not found."));
                }),
        )
        .run(&mut server, db)
        .await;
}
