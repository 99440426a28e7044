use crate::common::{TestApp, routes};

fn slugs(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn anonymous_user_sees_whole_catalog_without_status() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROBLEMS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 17);
        let first = &res.body["data"][0];
        assert_eq!(first["slug"], "two-sum");
        assert_eq!(first["difficulty"], "Easy");
        assert!(first["status"].is_null());
        assert!(first.get("statement").is_none());
    }

    #[tokio::test]
    async fn authenticated_user_sees_own_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "password123").await;

        let res = app.submit("two-sum", "Accepted", &token).await;
        assert_eq!(res.status, 201, "{}", res.text);
        let res = app.submit("valid-parentheses", "WrongAnswer", &token).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app.get_with_token(routes::PROBLEMS, &token).await;
        assert_eq!(res.status, 200);
        let status_of = |slug: &str| {
            res.body["data"]
                .as_array()
                .unwrap()
                .iter()
                .find(|p| p["slug"] == slug)
                .map(|p| p["status"].clone())
                .unwrap()
        };
        assert_eq!(status_of("two-sum"), "Solved");
        assert_eq!(status_of("valid-parentheses"), "Attempted");
        assert_eq!(status_of("permutations"), "Todo");
    }

    #[tokio::test]
    async fn filters_by_difficulty_and_tag() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!(
                "{}?difficulty=Medium&tag=Recursion",
                routes::PROBLEMS
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            slugs(&res.body),
            [
                "generate-parentheses",
                "kth-smallest-element-in-a-bst",
                "permutations"
            ]
        );
        assert_eq!(res.body["total"], 3);
    }

    #[tokio::test]
    async fn search_matches_title_case_insensitively() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?search=LINKED", routes::PROBLEMS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(slugs(&res.body), ["reverse-linked-list"]);
    }

    #[tokio::test]
    async fn unknown_difficulty_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?difficulty=Trivial", routes::PROBLEMS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_even_on_public_listing() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PROBLEMS, "garbage").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod grouping {
    use super::*;

    #[tokio::test]
    async fn companies_are_alphabetical_and_sorted_by_difficulty() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROBLEMS_BY_COMPANY).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let groups = res.body["groups"].as_array().unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g["name"].as_str().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let rank = |d: &str| match d {
            "Easy" => 0,
            "Medium" => 1,
            _ => 2,
        };
        for group in groups {
            let levels: Vec<i32> = group["problems"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| rank(p["difficulty"].as_str().unwrap()))
                .collect();
            assert!(levels.windows(2).all(|w| w[0] <= w[1]), "{}", group["name"]);
        }
    }

    #[tokio::test]
    async fn categories_cover_every_problem_once() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PROBLEMS_BY_CATEGORY).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let total: usize = res.body["groups"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["problems"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 17);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn problem_detail_includes_statement() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::problem("two-sum")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Two Sum");
        assert!(res.body["statement"].as_str().unwrap().contains("target"));
        assert!(res.body["status"].is_null());
    }

    #[tokio::test]
    async fn unknown_problem_returns_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::problem("no-such-problem")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
