mod support;

use reqwest::StatusCode;
use serde_json::json;
use support::{send, spawn_app};

#[tokio::test]
async fn creator_stays_member_and_admin() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, group) = send(app.post(
        &ana,
        "/api/groups",
        json!({ "name": "Bakers", "creatorId": "ana", "memberIds": ["bo"], "adminIds": null }),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(group["memberIds"], json!(["bo", "ana"]));
    assert_eq!(group["adminIds"], json!(["ana"]));
    assert_eq!(group["isPublic"], true);
    let id = group["id"].as_str().unwrap();

    let (status, group) =
        send(app.put(&ana, &format!("/api/groups/{id}/members"), json!(["cy"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["memberIds"], json!(["cy", "ana"]));

    let (_, group) = send(app.put(&ana, &format!("/api/groups/{id}/admins"), json!([]))).await;
    assert_eq!(group["adminIds"], json!(["ana"]));

    let (status, _) = send(app.put(&ana, "/api/groups/missing/members", json!(["cy"]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn group_requires_creator() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, _) = send(app.post(&ana, "/api/groups", json!({ "name": "Orphans" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn group_queries_and_updates() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (_, open) =
        send(app.post(&ana, "/api/groups", json!({ "name": "Open", "creatorId": "ana" }))).await;
    send(app.post(
        &ana,
        "/api/groups",
        json!({ "name": "Closed", "creatorId": "bo", "isPublic": false, "memberIds": ["ana"] }),
    ))
    .await;

    let (_, public) = send(app.get(&ana, "/api/groups/public")).await;
    assert_eq!(public.as_array().unwrap().len(), 1);
    assert_eq!(public[0]["name"], "Open");

    let (_, created) = send(app.get(&ana, "/api/groups/creator/bo")).await;
    assert_eq!(created[0]["name"], "Closed");

    let (_, member) = send(app.get(&ana, "/api/groups/member/ana")).await;
    assert_eq!(member.as_array().unwrap().len(), 2);

    let id = open["id"].as_str().unwrap();
    let (status, updated) = send(app.put(
        &ana,
        &format!("/api/groups/{id}"),
        json!({
            "name": "Open kitchen",
            "tags": ["bread"],
            "isPublic": false,
            "creatorId": "mallory",
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Open kitchen");
    assert_eq!(updated["creatorId"], "ana");
    assert_eq!(updated["isPublic"], false);

    let (status, fetched) = send(app.get(&ana, &format!("/api/groups/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["tags"], json!(["bread"]));

    let (status, _) = send(app.delete(&ana, &format!("/api/groups/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app.get(&ana, &format!("/api/groups/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn group_posts_newest_first() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, first) = send(app.post(
        &ana,
        "/api/group-posts",
        json!({ "groupId": "g1", "content": "first" }),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send(app.post(&ana, "/api/group-posts", json!({ "groupId": "g1", "content": "second" }))).await;
    send(app.post(
        &ana,
        "/api/group-posts",
        json!({ "groupId": "g2", "content": "elsewhere" }),
    ))
    .await;

    let (_, posts) = send(app.get(&ana, "/api/group-posts/group/g1")).await;
    assert_eq!(posts.as_array().unwrap().len(), 2);
    assert_eq!(posts[0]["content"], "second");

    let id = first["id"].as_str().unwrap();
    let (_, edited) = send(app.put(
        &ana,
        &format!("/api/group-posts/{id}"),
        json!({ "content": "edited" }),
    ))
    .await;
    assert_eq!(edited["content"], "edited");
    assert_eq!(edited["groupId"], "g1");

    let (status, _) = send(app.delete(&ana, &format!("/api/group-posts/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app.delete(&ana, &format!("/api/group-posts/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn meal_plans_accept_name_alias() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, plan) = send(app.post(
        &ana,
        "/api/MealPlans",
        json!({ "userId": "ana", "name": "Cut", "goal": "lean" }),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(plan["planName"], "Cut");
    let id = plan["id"].as_str().unwrap();

    let (_, mine) = send(app.get(&ana, "/api/MealPlans/ana")).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, updated) = send(app.put(
        &ana,
        &format!("/api/MealPlans/{id}"),
        json!({ "userId": "ana", "planName": "Bulk" }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["planName"], "Bulk");

    let (status, _) = send(app.put(&ana, "/api/MealPlans/missing", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.delete(&ana, &format!("/api/MealPlans/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn skill_shares_are_replaced_whole() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, share) = send(app.post(
        &ana,
        "/api/SkillShares",
        json!({ "userId": "ana", "mealDetails": "knife skills", "ingredients": "onion" }),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = share["id"].as_str().unwrap();

    let (status, replaced) = send(app.put(
        &ana,
        &format!("/api/SkillShares/{id}"),
        json!({ "userId": "ana", "mealDetails": "dicing" }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["mealDetails"], "dicing");
    assert!(replaced["ingredients"].is_null());

    let (status, _) = send(app.put(&ana, "/api/SkillShares/missing", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(app.get(&ana, "/api/SkillShares")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn status_updates_edit_display_fields() {
    let app = spawn_app().await;
    let ana = app.sign_up("ana").await;

    let (status, update) = send(app.post(
        &ana,
        "/api/workoutStatusUpdates",
        json!({ "userId": "ana", "title": "Run", "exerciseType": "cardio", "timeDuration": 30 }),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(update["timestamp"].is_string());
    let id = update["id"].as_str().unwrap();

    let (_, edited) = send(app.put(
        &ana,
        &format!("/api/workoutStatusUpdates/{id}"),
        json!({ "title": "Long run", "exerciseType": "swim" }),
    ))
    .await;
    assert_eq!(edited["title"], "Long run");
    assert_eq!(edited["exerciseType"], "cardio");
    assert_eq!(edited["timeDuration"], 30);

    let (_, mine) = send(app.get(&ana, "/api/workoutStatusUpdates/ana")).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, _) = send(app.delete(&ana, &format!("/api/workoutStatusUpdates/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
