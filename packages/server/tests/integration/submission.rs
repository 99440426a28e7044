use crate::common::{TestApp, routes};
use serde_json::json;

/// A complete judged submission payload.
fn judged_submission_body(status: &str) -> serde_json::Value {
    json!({
        "language": "cpp",
        "code": "#include <vector>\nclass Solution {};",
        "status": status,
        "runtime_ms": 12,
        "memory_kb": 9200,
        "test_cases_passed": 57,
        "total_test_cases": 57,
    })
}

mod submission_creation {
    use super::*;

    #[tokio::test]
    async fn accepted_submission_solves_the_problem() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_submissions("two-sum"),
                &judged_submission_body("Accepted"),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["problem_slug"], "two-sum");
        assert_eq!(res.body["problem_title"], "Two Sum");
        assert_eq!(res.body["language"], "cpp");
        assert_eq!(res.body["status"], "Accepted");
        assert_eq!(res.body["runtime_ms"], 12);
        assert_eq!(res.body["progress"]["saved"], true);
        assert_eq!(res.body["progress"]["status"], "Solved");
        assert_eq!(res.body["progress"]["newly_solved"], true);
    }

    #[tokio::test]
    async fn second_accepted_submission_is_not_newly_solved() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let first = app.submit("two-sum", "Accepted", &token).await;
        assert_eq!(first.status, 201, "{}", first.text);
        let second = app.submit("two-sum", "Accepted", &token).await;

        assert_eq!(second.status, 201);
        assert_eq!(second.body["progress"]["status"], "Solved");
        assert_eq!(second.body["progress"]["newly_solved"], false);
    }

    #[tokio::test]
    async fn wrong_answer_marks_problem_attempted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app.submit("permutations", "WrongAnswer", &token).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["progress"]["status"], "Attempted");
        assert_eq!(res.body["progress"]["newly_solved"], false);
    }

    #[tokio::test]
    async fn pending_submission_leaves_progress_untouched() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app.submit("two-sum", "Pending", &token).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["progress"].is_null());

        let progress = app
            .get_with_token(&routes::problem_progress("two-sum"), &token)
            .await;
        assert_eq!(progress.body["status"], "Todo");
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                &routes::problem_submissions("two-sum"),
                &judged_submission_body("Accepted"),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn returns_404_for_nonexistent_problem() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app.submit("no-such-problem", "Accepted", &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod submission_validation {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_code() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let mut body = judged_submission_body("Accepted");
        body["code"] = json!("   ");

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_empty_language() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let mut body = judged_submission_body("Accepted");
        body["language"] = json!("");

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_unknown_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_submissions("two-sum"),
                &judged_submission_body("Solved"),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_more_passed_than_total_test_cases() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let mut body = judged_submission_body("WrongAnswer");
        body["test_cases_passed"] = json!(58);

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_oversized_code() {
        let app = TestApp::spawn_with(|config| config.submission.max_code_bytes = 64).await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let mut body = judged_submission_body("Accepted");
        body["code"] = json!("x".repeat(65));

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejected_submission_does_not_change_progress() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let mut body = judged_submission_body("Accepted");
        body["code"] = json!("");

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;
        assert_eq!(res.status, 400);

        let progress = app.get_with_token(routes::PROGRESS, &token).await;
        assert_eq!(progress.body["problems"], json!({}));
    }
}

mod source_size {
    use super::*;

    /// Multi-line source with quotes and backslashes, `len` bytes long.
    fn escape_heavy_code(len: usize) -> String {
        let line = "x = \"\\\\\"\n";
        let mut code = line.repeat(len / line.len());
        code.push_str(&"#".repeat(len - code.len()));
        code
    }

    #[tokio::test]
    async fn submission_just_under_the_limit_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let code = escape_heavy_code(65_530);
        let mut body = judged_submission_body("Accepted");
        body["code"] = json!(code);
        assert!(body.to_string().len() > 65_536 + 4096);

        let res = app
            .post_with_token(&routes::problem_submissions("two-sum"), &body, &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["code"].as_str().unwrap().len(), 65_530);
    }

    #[tokio::test]
    async fn run_just_under_the_limit_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_run("two-sum"),
                &json!({"language": "python", "code": escape_heavy_code(65_536)}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["progress"]["status"], "Attempted");
    }

    #[tokio::test]
    async fn one_byte_over_the_limit_is_rejected_by_size_check() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_run("two-sum"),
                &json!({"language": "python", "code": escape_heavy_code(65_537)}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("65536"));
    }
}

mod progress_write_failure {
    use super::*;

    #[tokio::test]
    async fn submission_is_kept_when_progress_write_fails() {
        let app = TestApp::spawn_with_failing_progress().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_submissions("two-sum"),
                &judged_submission_body("Accepted"),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["problem_slug"], "two-sum");
        assert_eq!(res.body["status"], "Accepted");
        assert_eq!(res.body["progress"]["saved"], false);
        assert!(res.body["progress"]["status"].is_null());
        assert_eq!(res.body["progress"]["newly_solved"], false);
        assert!(res.body["progress"]["error"].is_string());

        let stored = app.get_with_token(&routes::submission(res.id()), &token).await;
        assert_eq!(stored.status, 200);
    }

    #[tokio::test]
    async fn run_reports_failed_progress_write() {
        let app = TestApp::spawn_with_failing_progress().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_run("two-sum"),
                &json!({"language": "python", "code": "print(1)"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["progress"]["saved"], false);
        assert!(res.body["progress"]["error"].is_string());
    }
}

mod rate_limiting {
    use super::*;

    #[tokio::test]
    async fn returns_429_when_rate_limit_exceeded() {
        let app = TestApp::spawn_with(|config| config.submission.rate_limit_per_minute = 3).await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        for i in 0..3 {
            let res = app.submit("two-sum", "WrongAnswer", &token).await;
            assert_eq!(res.status, 201, "Submission {} failed", i + 1);
        }

        let res = app.submit("two-sum", "Accepted", &token).await;

        assert_eq!(res.status, 429);
        assert_eq!(res.body["code"], "RATE_LIMITED");

        // The throttled attempt must not count as a solve.
        let progress = app
            .get_with_token(&routes::problem_progress("two-sum"), &token)
            .await;
        assert_eq!(progress.body["status"], "Attempted");
    }

    #[tokio::test]
    async fn rate_limit_is_per_user() {
        let app = TestApp::spawn_with(|config| config.submission.rate_limit_per_minute = 2).await;
        let token1 = app.create_authenticated_user("user1", "pass12345").await;
        let token2 = app.create_authenticated_user("user2", "pass12345").await;

        for _ in 0..2 {
            let res = app.submit("two-sum", "WrongAnswer", &token1).await;
            assert_eq!(res.status, 201);
        }
        let res = app.submit("two-sum", "WrongAnswer", &token1).await;
        assert_eq!(res.status, 429);

        let res = app.submit("two-sum", "Accepted", &token2).await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn zero_disables_rate_limiting() {
        let app = TestApp::spawn_with(|config| config.submission.rate_limit_per_minute = 0).await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        for _ in 0..12 {
            let res = app.submit("two-sum", "WrongAnswer", &token).await;
            assert_eq!(res.status, 201, "{}", res.text);
        }
    }
}

mod run_action {
    use super::*;

    #[tokio::test]
    async fn run_marks_untouched_problem_attempted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app
            .post_with_token(
                &routes::problem_run("climbing-stairs"),
                &json!({"language": "python", "code": "print(1)"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["problem_slug"], "climbing-stairs");
        assert_eq!(res.body["progress"]["status"], "Attempted");

        let list = app.get_with_token(routes::SUBMISSIONS, &token).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn run_after_solve_keeps_problem_solved() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let res = app.submit("climbing-stairs", "Accepted", &token).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app
            .post_with_token(
                &routes::problem_run("climbing-stairs"),
                &json!({"language": "python", "code": "print(1)"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["progress"]["status"], "Solved");
    }

    #[tokio::test]
    async fn run_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                &routes::problem_run("climbing-stairs"),
                &json!({"language": "python", "code": "print(1)"}),
            )
            .await;

        assert_eq!(res.status, 401);
    }
}

mod submission_listing {
    use super::*;

    #[tokio::test]
    async fn user_sees_own_submissions_newest_first() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let first = app.submit("two-sum", "WrongAnswer", &token).await.id();
        let second = app.submit("permutations", "Accepted", &token).await.id();

        let res = app.get_with_token(routes::SUBMISSIONS, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second);
        assert_eq!(data[1]["id"], first);
        assert_eq!(data[0]["problem_title"], "Permutations");
        assert!(data[0].get("code").is_none());
    }

    #[tokio::test]
    async fn user_does_not_see_other_users_submissions() {
        let app = TestApp::spawn().await;
        let token1 = app.create_authenticated_user("user1", "pass12345").await;
        let token2 = app.create_authenticated_user("user2", "pass12345").await;
        let res = app.submit("two-sum", "Accepted", &token1).await;
        assert_eq!(res.status, 201);

        let res = app.get_with_token(routes::SUBMISSIONS, &token2).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn can_filter_by_problem_and_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        app.submit("two-sum", "WrongAnswer", &token).await;
        app.submit("two-sum", "Accepted", &token).await;
        app.submit("permutations", "Accepted", &token).await;

        let res = app
            .get_with_token(
                &format!("{}?problem_slug=two-sum&status=Accepted", routes::SUBMISSIONS),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["problem_slug"], "two-sum");
        assert_eq!(data[0]["status"], "Accepted");
    }

    #[tokio::test]
    async fn returns_pagination_info() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        for _ in 0..3 {
            app.submit("two-sum", "WrongAnswer", &token).await;
        }

        let res = app
            .get_with_token(&format!("{}?page=2&per_page=2", routes::SUBMISSIONS), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["pagination"]["page"], 2);
        assert_eq!(res.body["pagination"]["per_page"], 2);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }
}

mod submission_detail {
    use super::*;

    #[tokio::test]
    async fn owner_can_view_submission_detail() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;
        let id = app.submit("two-sum", "Accepted", &token).await.id();

        let res = app.get_with_token(&routes::submission(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["code"], "class Solution:\n    pass");
        assert_eq!(res.body["status"], "Accepted");
    }

    #[tokio::test]
    async fn non_owner_cannot_view_submission() {
        let app = TestApp::spawn().await;
        let token1 = app.create_authenticated_user("user1", "pass12345").await;
        let token2 = app.create_authenticated_user("user2", "pass12345").await;
        let id = app.submit("two-sum", "Accepted", &token1).await.id();

        let res = app.get_with_token(&routes::submission(id), &token2).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn returns_404_for_nonexistent_submission() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("user1", "pass12345").await;

        let res = app.get_with_token(&routes::submission(99999), &token).await;

        assert_eq!(res.status, 404);
    }
}
