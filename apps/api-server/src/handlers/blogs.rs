//! Blog handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Blog, NewBlog};
use quill_core::query::{BlogQuery, ListFilters};
use quill_core::validation::{BlogOwner, parse_object_id};
use quill_shared::dto::{
    BlogListResponse, BlogOwnerQuery, BlogResponse, CreateBlogRequest, CreateBlogResponse,
    ListBlogsQuery,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(blog: Blog) -> BlogResponse {
    BlogResponse {
        id: blog.id.to_hex(),
        title: blog.title,
        description: blog.description,
        user: blog.user.to_hex(),
        category: blog.category.to_hex(),
        created_at: blog.created_at,
    }
}

/// GET /api/blogs
#[tracing::instrument(name = "List blogs", skip(state, params))]
pub async fn list_blogs(
    state: web::Data<AppState>,
    params: web::Query<ListBlogsQuery>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();

    let owner = BlogOwner::parse(params.user_id.as_deref(), params.category_id.as_deref())?;
    let filters = ListFilters {
        keywords: params.keywords.as_deref(),
        start_date: params.start_date.as_deref(),
        end_date: params.end_date.as_deref(),
        page: params.page.as_deref(),
        limit: params.limit.as_deref(),
    };
    let query = BlogQuery::for_owner(owner)
        .filters(&filters, state.max_page_size)?
        .build();

    let blogs = state
        .blogs
        .list(&query)
        .await
        .map_err(|e| AppError::from(e).context("Error in fetching blogs"))?;

    Ok(HttpResponse::Ok().json(BlogListResponse {
        blogs: blogs.into_iter().map(to_response).collect(),
    }))
}

/// POST /api/blogs
#[tracing::instrument(name = "Create blog", skip(state, params, body))]
pub async fn create_blog(
    state: web::Data<AppState>,
    params: web::Query<BlogOwnerQuery>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let owner = BlogOwner::parse(params.user_id.as_deref(), params.category_id.as_deref())?;
    let body = body.into_inner();

    let blog = state
        .blogs
        .create(NewBlog::new(
            owner.user,
            owner.category,
            body.title,
            body.description,
        ))
        .await
        .map_err(|e| AppError::from(e).context("Error in creating blog"))?;

    Ok(HttpResponse::Created().json(CreateBlogResponse {
        message: "Blog is created".to_string(),
        blog: to_response(blog),
    }))
}

/// GET /api/blogs/{blog}
#[tracing::instrument(name = "Get blog", skip(state, params))]
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<BlogOwnerQuery>,
) -> AppResult<HttpResponse> {
    let owner = BlogOwner::parse(params.user_id.as_deref(), params.category_id.as_deref())?;
    let blog_id = parse_object_id(Some(path.as_str()), "blogId")?;

    let blog = state
        .blogs
        .find_owned(blog_id, &owner)
        .await
        .map_err(|e| AppError::from(e).context("Error in fetching a blog"))?;

    Ok(HttpResponse::Ok().json(BlogListResponse {
        blogs: vec![to_response(blog)],
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::json;

    use quill_core::domain::{Category, ObjectId, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, BlogRepository, CategoryRepository, UserRepository};
    use quill_infra::{DataStore, InMemoryStore, Repositories};
    use quill_shared::ErrorResponse;

    use super::*;
    use crate::middleware::error::{json_config, query_config};

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(json_config())
                    .app_data(query_config())
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    /// Records whether any repository method ran.
    #[derive(Default)]
    struct Untouchable {
        touched: AtomicBool,
    }

    impl Untouchable {
        fn touch(&self) -> RepoError {
            self.touched.store(true, Ordering::SeqCst);
            RepoError::Query("store must not be reached".into())
        }
    }

    #[async_trait]
    impl BaseRepository<User, ObjectId> for Untouchable {
        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<User>, RepoError> {
            Err(self.touch())
        }
    }

    impl UserRepository for Untouchable {}

    #[async_trait]
    impl BaseRepository<Category, ObjectId> for Untouchable {
        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Category>, RepoError> {
            Err(self.touch())
        }
    }

    impl CategoryRepository for Untouchable {}

    #[async_trait]
    impl BaseRepository<Blog, ObjectId> for Untouchable {
        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Blog>, RepoError> {
            Err(self.touch())
        }
    }

    #[async_trait]
    impl BlogRepository for Untouchable {
        async fn find_matching(&self, _query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
            Err(self.touch())
        }

        async fn insert(&self, _blog: NewBlog) -> Result<Blog, RepoError> {
            Err(self.touch())
        }
    }

    /// Blog queries fail as if the server were unreachable.
    struct Unreachable;

    #[async_trait]
    impl BaseRepository<Blog, ObjectId> for Unreachable {
        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Blog>, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
    }

    #[async_trait]
    impl BlogRepository for Unreachable {
        async fn find_matching(&self, _query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }

        async fn insert(&self, _blog: NewBlog) -> Result<Blog, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
    }

    struct Seeded {
        store: Arc<InMemoryStore>,
        user: String,
        category: String,
    }

    impl Seeded {
        async fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let (user, category) = (ObjectId::new(), ObjectId::new());
            store.add_user(User::new(user)).await;
            store.add_category(Category::new(category)).await;
            Self {
                store,
                user: user.to_hex(),
                category: category.to_hex(),
            }
        }

        fn state(&self) -> AppState {
            AppState::new(DataStore::InMemory(self.store.clone()), 100)
        }

        fn owner_query(&self) -> String {
            format!("userId={}&categoryId={}", self.user, self.category)
        }

        async fn create(&self, title: &str, description: &str) -> Blog {
            let owner = BlogOwner::parse(Some(self.user.as_str()), Some(self.category.as_str())).unwrap();
            self.store
                .insert(NewBlog::new(owner.user, owner.category, title, description))
                .await
                .unwrap()
        }
    }

    fn untouchable_state() -> (Arc<Untouchable>, AppState) {
        let repo = Arc::new(Untouchable::default());
        let repositories = Repositories {
            users: repo.clone(),
            categories: repo.clone(),
            blogs: repo.clone(),
        };
        let store = DataStore::from_config(None).unwrap();
        (repo, AppState::with_repositories(store, repositories, 100))
    }

    #[actix_rt::test]
    async fn malformed_ids_are_rejected_before_store_access() {
        let (repo, state) = untouchable_state();
        let app = test_app!(state);
        let valid = ObjectId::new().to_hex();

        let requests = vec![
            ("/api/blogs".to_string(), "Invalid or missing userId"),
            (format!("/api/blogs?userId=abc&categoryId={valid}"), "Invalid or missing userId"),
            (format!("/api/blogs?userId={valid}"), "Invalid or missing categoryId"),
            (
                format!("/api/blogs?userId={valid}&categoryId=not-an-id"),
                "Invalid or missing categoryId",
            ),
            (
                format!("/api/blogs/123?userId={valid}&categoryId={valid}"),
                "Invalid or missing blogId",
            ),
            (format!("/api/blogs/{valid}?categoryId={valid}"), "Invalid or missing userId"),
        ];

        for (uri, message) in requests {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.detail.as_deref(), Some(message), "{uri}");
        }

        let req = test::TestRequest::post()
            .uri(&format!("/api/blogs?userId=&categoryId={valid}"))
            .set_json(json!({ "title": "T", "description": "D" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert!(!repo.touched.load(Ordering::SeqCst));
    }

    #[actix_rt::test]
    async fn unparseable_dates_are_rejected_before_store_access() {
        let (repo, state) = untouchable_state();
        let app = test_app!(state);
        let valid = ObjectId::new().to_hex();

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?userId={valid}&categoryId={valid}&endDate=soon"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail.as_deref(), Some("Invalid endDate"));
        assert!(!repo.touched.load(Ordering::SeqCst));
    }

    #[actix_rt::test]
    async fn unknown_user_then_unknown_category_are_not_found() {
        let seeded = Seeded::new().await;
        let app = test_app!(seeded.state());
        let stranger = ObjectId::new().to_hex();

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?userId={stranger}&categoryId={stranger}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail.as_deref(), Some("User not found"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/blogs?userId={}&categoryId={stranger}", seeded.user))
            .set_json(json!({ "title": "T", "description": "D" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail.as_deref(), Some("Category not found"));
    }

    #[actix_rt::test]
    async fn create_returns_created_blog() {
        let seeded = Seeded::new().await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::post()
            .uri(&format!("/api/blogs?{}", seeded.owner_query()))
            .set_json(json!({ "title": "T", "description": "D" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: CreateBlogResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Blog is created");
        assert_eq!(body.blog.title, "T");
        assert_eq!(body.blog.description, "D");
        assert_eq!(body.blog.user, seeded.user);
        assert_eq!(body.blog.category, seeded.category);
        assert_eq!(body.blog.id.len(), 24);
    }

    #[actix_rt::test]
    async fn create_rejects_incomplete_body() {
        let seeded = Seeded::new().await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::post()
            .uri(&format!("/api/blogs?{}", seeded.owner_query()))
            .set_json(json!({ "title": "T" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn list_filters_by_keywords_and_paginates() {
        let seeded = Seeded::new().await;
        seeded.create("foobar", "first").await;
        seeded.create("second", "has FOO in it").await;
        seeded.create("third", "nothing here").await;
        seeded.create("Foo again", "fourth").await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?{}&keywords=foo", seeded.owner_query()))
            .to_request();
        let body: BlogListResponse = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = body.blogs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["foobar", "second", "Foo again"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?{}&page=2&limit=2", seeded.owner_query()))
            .to_request();
        let body: BlogListResponse = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = body.blogs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "Foo again"]);
    }

    #[actix_rt::test]
    async fn list_applies_date_range() {
        let seeded = Seeded::new().await;
        seeded.create("recent", "d").await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/blogs?{}&startDate=2000-01-01&endDate=2999-12-31",
                seeded.owner_query()
            ))
            .to_request();
        let body: BlogListResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.blogs.len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?{}&endDate=2000-01-01", seeded.owner_query()))
            .to_request();
        let body: BlogListResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.blogs.is_empty());
    }

    #[actix_rt::test]
    async fn list_past_the_last_page_is_empty() {
        let seeded = Seeded::new().await;
        seeded.create("only", "d").await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/blogs?{}&page=18446744073709551615&limit=10",
                seeded.owner_query()
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: BlogListResponse = test::read_body_json(resp).await;
        assert!(body.blogs.is_empty());
    }

    #[actix_rt::test]
    async fn get_blog_returns_owned_blog_only() {
        let seeded = Seeded::new().await;
        let blog = seeded.create("mine", "d").await;
        let app = test_app!(seeded.state());

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{}?{}", blog.id.to_hex(), seeded.owner_query()))
            .to_request();
        let body: BlogListResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.blogs.len(), 1);
        assert_eq!(body.blogs[0].id, blog.id.to_hex());

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/blogs/{}?{}",
                ObjectId::new().to_hex(),
                seeded.owner_query()
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail.as_deref(), Some("Blog not found"));
    }

    #[actix_rt::test]
    async fn store_failures_surface_as_internal_errors() {
        let seeded = Seeded::new().await;
        let repositories = Repositories {
            users: seeded.store.clone(),
            categories: seeded.store.clone(),
            blogs: Arc::new(Unreachable),
        };
        let state = AppState::with_repositories(
            DataStore::InMemory(seeded.store.clone()),
            repositories,
            100,
        );
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs?{}", seeded.owner_query()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        let detail = body.detail.unwrap();
        assert!(detail.starts_with("Error in fetching blogs: "), "{detail}");
        assert!(detail.contains("connection refused"), "{detail}");
    }
}
