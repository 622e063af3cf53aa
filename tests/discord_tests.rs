mod common;

use axum::http::{Method, StatusCode};
use common::{Player, TestApp, names, spawn_app};
use serde_json::json;

const DISCORD: &str = "/api/discord/characters";

/// testuser1 plays Meepo and Tasha publicly plus one private character.
async fn seed(t: &TestApp) -> (Player, String) {
    let player = t.player("testuser1", Some("TestUser1#4242")).await;
    t.character(&player, "Tasha").await;
    t.character(&player, "Meepo").await;
    t.storage
        .create_character(player.user.id, "Secret Agent", 3, false)
        .await
        .unwrap();

    let other = t.player("testuser2", Some("SomeoneElse#0001")).await;
    t.character(&other, "Elminster").await;

    let apikey = t.storage.create_api_key("discord bot").await.unwrap();
    (player, apikey)
}

#[tokio::test]
async fn search_by_valid_discord_id() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "testuser1#4242" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Meepo", "Tasha"]);
    assert_eq!(body[0]["player"], "testuser1");
    assert_eq!(body[0]["level"], 5);
}

#[tokio::test]
async fn search_by_unknown_discord_id_returns_empty_list() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "DrizztGod#0001" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_by_discord_id_with_space() {
    let t = spawn_app().await;
    let (player, apikey) = seed(&t).await;
    t.storage
        .set_discord_id(player.user.id, "Volothamp Gedarm#1337")
        .await
        .unwrap();

    let form = format!("apikey={apikey}&discord_id=Volothamp+Gedarm%231337");
    let (status, body) = t.post_form(DISCORD, &form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Meepo", "Tasha"]);
}

#[tokio::test]
async fn search_tolerates_formatting_variants() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;
    let player = t.player("newstyle", Some("meepo_enjoyer")).await;
    t.character(&player, "Yeenoghu Jr").await;

    for variant in ["  TESTUSER1#4242 ", "@testuser1#4242"] {
        let (status, body) = t
            .call(
                Method::POST,
                DISCORD,
                None,
                Some(json!({ "apikey": apikey, "discord_id": variant })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "variant {variant:?}");
        assert_eq!(names(&body), vec!["Meepo", "Tasha"], "variant {variant:?}");
    }

    let (_, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "Meepo_Enjoyer#0" })),
        )
        .await;
    assert_eq!(names(&body), vec!["Yeenoghu Jr"]);
}

#[tokio::test]
async fn invalid_api_key_is_forbidden() {
    let t = spawn_app().await;
    seed(&t).await;

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": "wrong", "discord_id": "testuser1#4242" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid API key");
}

#[tokio::test]
async fn missing_fields_read_as_blank() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;

    let (status, body) = t
        .call(Method::POST, DISCORD, None, Some(json!({ "apikey": apikey })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "discord_id": "testuser1#4242" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid API key");
}

#[tokio::test]
async fn matching_folds_non_ascii_case() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;
    let elodie = t.player("elodie", Some("ÉLODIE")).await;
    t.character(&elodie, "Shalelu").await;

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "élodie" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Shalelu"]);
}

#[tokio::test]
async fn stored_mention_prefix_is_ignored() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;
    let volo = t.player("volo", Some("@ Volo")).await;
    t.character(&volo, "Volothamp").await;

    let (status, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "volo" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Volothamp"]);
}

#[tokio::test]
async fn characters_are_ordered_ignoring_case() {
    let t = spawn_app().await;
    let (_, apikey) = seed(&t).await;
    let player = t.player("mixed", Some("Mixed#1111")).await;
    t.character(&player, "zed").await;
    t.character(&player, "Aldo").await;
    t.character(&player, "bree").await;

    let (_, body) = t
        .call(
            Method::POST,
            DISCORD,
            None,
            Some(json!({ "apikey": apikey, "discord_id": "mixed#1111" })),
        )
        .await;
    assert_eq!(names(&body), vec!["Aldo", "bree", "zed"]);
}
