use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use namaste_foodie::{
    router, AppError, AppState, CsvRecipeStore, Flipbook, ImageSource, Recipe, RecipeStore,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Image source that never finds anything
struct NoImages;

#[async_trait]
impl ImageSource for NoImages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        Err(AppError::ImageStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

struct TestApp {
    _dir: TempDir,
    store: Arc<CsvRecipeStore>,
    app: Router,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvRecipeStore::new(dir.path().join("recipes.csv")));
    let state = AppState::new(
        store.clone(),
        Arc::new(NoImages),
        Flipbook::new("Test Book", "Test subtitle"),
    );
    TestApp {
        _dir: dir,
        store,
        app: router(state),
    }
}

fn recipe(name: &str, state: &str, ingredients: &str) -> Recipe {
    Recipe {
        name: name.to_string(),
        ingredients: ingredients.to_string(),
        steps: "Temper mustard seeds. Add lentils. Simmer.".to_string(),
        background: "Everyday comfort".to_string(),
        state: state.to_string(),
        image: "https://images.example.com/dish.jpg".to_string(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_home_page_with_empty_store() {
    let t = test_app();
    let response = t.app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Namaste, Foodie"));
    assert!(html.contains("Reviving Traditions, One Recipe at a Time!"));
    assert!(html.contains("No recipes available yet!"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind, Tomato")).unwrap();
    t.store.append(&recipe("Sambar", "Tamil Nadu", "Toor dal, Tamarind")).unwrap();

    let response = t.app.clone().oneshot(get("/?q=RASAM")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<h3>Rasam</h3>"));
    assert!(!html.contains("<h3>Sambar</h3>"));
    assert!(html.contains("1. Temper mustard seeds"));

    let response = t.app.oneshot(get("/?q=biryani")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("No matching recipes found."));
}

#[tokio::test]
async fn test_valid_submission_is_stored() {
    let t = test_app();
    let body = "name=Pesarattu&ingredients=Green+gram%2C+Ginger&steps=Soak.+Grind.+Spread.&background=Andhra+breakfast&state=Andhra+Pradesh&image=";
    let response = t.app.clone().oneshot(post_form("/recipes", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?added=true"
    );

    let stored = t.store.load().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Pesarattu");
    assert_eq!(stored[0].ingredients, "Green gram, Ginger");
    assert_eq!(stored[0].image, "N/A");

    let response = t.app.oneshot(get("/?added=true")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Recipe added successfully!"));
}

#[tokio::test]
async fn test_incomplete_submission_is_rejected() {
    let t = test_app();
    let body = "name=Upma&ingredients=Rava&steps=&background=&state=Karnataka&image=";
    let response = t.app.oneshot(post_form("/recipes", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Please fill out all fields!"));
    assert!(html.contains("value=\"Upma\""));
    assert!(t.store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_shopping_list_generation_and_download() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind, Tomato")).unwrap();
    t.store.append(&recipe("Sambar", "Tamil Nadu", "Toor dal, Tamarind")).unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_form("/shopping-list", "recipe=Rasam&recipe=Sambar"))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<li>Tamarind: 2 Portions</li>"));
    assert!(html.contains("<li>Toor dal: 1 Portions</li>"));

    let response = t
        .app
        .oneshot(post_form("/shopping-list/download", "recipe=Rasam&recipe=Sambar"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"shopping_list.txt\""
    );
    assert_eq!(
        body_text(response).await,
        "Tamarind: 2\nTomato: 1\nToor dal: 1"
    );
}

#[tokio::test]
async fn test_shopping_list_requires_a_selection() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind")).unwrap();

    let response = t.app.oneshot(post_form("/shopping-list", "")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Please select at least one recipe!"));
}

#[tokio::test]
async fn test_flipbook_download() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind")).unwrap();
    t.store.append(&recipe("Dhokla", "Gujarat", "Besan")).unwrap();

    let response = t
        .app
        .oneshot(post_form("/flipbook", "state=Tamil+Nadu"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"recipes_Tamil Nadu.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_flipbook_without_matches_warns() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind")).unwrap();

    let response = t
        .app
        .oneshot(post_form("/flipbook", "state=Goa"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No recipes available for the selected states."));
}

#[tokio::test]
async fn test_static_and_listing_pages() {
    let t = test_app();
    t.store.append(&recipe("Rasam", "Tamil Nadu", "Tamarind")).unwrap();

    let html = body_text(t.app.clone().oneshot(get("/nani-secrets")).await.unwrap()).await;
    assert!(html.contains("Timeless Tips from Nani's Kitchen:"));

    let html = body_text(t.app.clone().oneshot(get("/recipes")).await.unwrap()).await;
    assert!(html.contains("<h3>Rasam</h3>"));
    assert!(html.contains("src=\"https://images.example.com/dish.jpg\""));

    let html = body_text(t.app.oneshot(get("/recipes/new")).await.unwrap()).await;
    assert!(html.contains("Add Your Recipe"));
}

#[tokio::test]
async fn test_malformed_row_does_not_take_the_site_down() {
    let t = test_app();
    let mut content = b"Name,Ingredients,Steps,Background,State,Image\n".to_vec();
    content.extend_from_slice(b"Rasam,Tamarind,Boil.,Everyday,Tamil Nadu,N/A\n");
    content.extend_from_slice(b"Bad\xff,Dal\n");
    content.extend_from_slice(b"Worse,\"Dal,Boil.\n");
    std::fs::write(t.store.path(), content).unwrap();

    let response = t.app.clone().oneshot(get("/?q=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h3>Rasam</h3>"));

    let response = t.app.oneshot(get("/shopping-list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("value=\"Rasam\""));
}
