mod common;

use axum::http::{Method, StatusCode};
use common::{names, spawn_app};
use serde_json::json;

const CONSUMABLES: &str = "/api/data/consumables";

#[tokio::test]
async fn create_and_list_consumables_by_name() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    for (name, kind, charges) in [
        ("Scroll of Fireball", "scroll", None),
        ("Arrows +1", "ammo", Some(20)),
        ("Potion of Healing", "potion", Some(1)),
    ] {
        let (status, body) = t
            .call(
                Method::POST,
                CONSUMABLES,
                Some(&alice.token),
                Some(json!({
                    "character_uuid": meepo.uuid,
                    "name": name,
                    "type": kind,
                    "charges": charges,
                    "item_source_type": "dmreward",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], kind);
        assert_eq!(body["source"]["name"], "Manual DM reward");
    }

    let (status, listed) = t
        .call(Method::GET, CONSUMABLES, Some(&alice.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&listed),
        vec!["Arrows +1", "Potion of Healing", "Scroll of Fireball"]
    );
    assert_eq!(listed[0]["display"], "Arrows +1 [20]");
    assert_eq!(listed[2]["display"], "Scroll of Fireball");
}

#[tokio::test]
async fn negative_charges_are_rejected() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    let (status, body) = t
        .call(
            Method::POST,
            CONSUMABLES,
            Some(&alice.token),
            Some(json!({
                "character_uuid": meepo.uuid,
                "name": "Wand of Secrets",
                "charges": -3,
                "item_source_type": "level5",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item creation failed");
}

#[tokio::test]
async fn update_spends_charges_for_the_owner_only() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let bob = t.player("bob", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    let (_, created) = t
        .call(
            Method::POST,
            CONSUMABLES,
            Some(&alice.token),
            Some(json!({
                "character_uuid": meepo.uuid,
                "name": "Bolts",
                "type": "ammo",
                "charges": 10,
                "item_source_type": "other",
                "item_source": "Bought in Phandalin",
            })),
        )
        .await;
    let uri = format!("{CONSUMABLES}/{}", created["uuid"].as_str().unwrap());

    let (status, _) = t
        .call(Method::PATCH, &uri, Some(&bob.token), Some(json!({ "charges": 0 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .call(
            Method::PATCH,
            &uri,
            Some(&alice.token),
            Some(json!({ "charges": 7, "equipped": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["charges"], 7);
    assert_eq!(body["equipped"], true);
    assert_eq!(body["name"], "Bolts");
    assert_eq!(body["source"]["name"], "Bought in Phandalin");

    let (status, body) = t
        .call(Method::PATCH, &uri, Some(&alice.token), Some(json!({ "charges": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["charges"].is_null());
}

#[tokio::test]
async fn destroy_consumable() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let bob = t.player("bob", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    let (_, created) = t
        .call(
            Method::POST,
            CONSUMABLES,
            Some(&alice.token),
            Some(json!({
                "character_uuid": meepo.uuid,
                "name": "Potion of Climbing",
                "type": "potion",
                "item_source_type": "level5",
            })),
        )
        .await;
    let uri = format!("{CONSUMABLES}/{}", created["uuid"].as_str().unwrap());

    let (status, _) = t.call(Method::DELETE, &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.call(Method::DELETE, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item destroyed");

    let (status, _) = t.call(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_values_fill_counts_and_flags() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    let form = format!(
        "character_uuid={}&name=Sling+Bullets&type=ammo&charges=30&equipped=on&description=&item_source_type=level5",
        meepo.uuid
    );
    let req = axum::http::Request::builder()
        .method(Method::POST)
        .uri(CONSUMABLES)
        .header("authorization", format!("Bearer {}", alice.token))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(form))
        .unwrap();
    let (status, body) = t.send(req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["charges"], 30);
    assert_eq!(body["equipped"], true);
    assert!(body["description"].is_null());
}

#[tokio::test]
async fn non_owner_update_is_forbidden_even_when_invalid() {
    let t = spawn_app().await;
    let alice = t.player("alice", None).await;
    let bob = t.player("bob", None).await;
    let meepo = t.character(&alice, "Meepo").await;

    let (_, created) = t
        .call(
            Method::POST,
            CONSUMABLES,
            Some(&alice.token),
            Some(json!({
                "character_uuid": meepo.uuid,
                "name": "Oil of Slipperiness",
                "type": "potion",
                "item_source_type": "level5",
            })),
        )
        .await;
    let uri = format!("{CONSUMABLES}/{}", created["uuid"].as_str().unwrap());

    let (status, _) = t
        .call(Method::PATCH, &uri, Some(&bob.token), Some(json!({ "type": "relic" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .call(Method::PATCH, &uri, Some(&alice.token), Some(json!({ "type": "relic" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data in item update");
}
