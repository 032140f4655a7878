//! The client controller.
//!
//! Owns the base-URL input value, the transient form state, and the last
//! rendered post list, and maps each user action to at most one request and
//! exactly one render or feedback outcome. The submit action is governed by an
//! explicit `FormMode` rather than a rebindable handler: `Create` issues a
//! POST, `Editing(id)` issues a PUT, and a successful update reverts the mode
//! to `Create`.
//!
//! Every failure is terminal for that one action — no retries, no timeouts —
//! and the controller stays usable for the next action.

use anyhow::{Context, Result};
use blog_core::{
    ApiError, HttpRequest, HttpResponse, Post, PostClient, PostInput, SearchField, SortDirection,
    SortField,
};

use crate::config::Config;
use crate::transport::Transport;
use crate::view::Screen;

/// What the submit action does: create a new post, or update the post whose
/// id was captured when edit mode was entered. At most one post is being
/// edited at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Editing(u64),
}

/// The transient form fields plus the submit mode. Never persisted.
#[derive(Debug, Clone)]
pub struct FormState {
    pub title: String,
    pub content: String,
    pub author: String,
    pub mode: FormMode,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            author: String::new(),
            mode: FormMode::Create,
        }
    }
}

impl FormState {
    fn input(&self) -> PostInput {
        PostInput {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
        }
    }
}

/// A request that made it onto the wire but did not produce a usable result.
enum RoundTripError {
    Transport,
    Api(ApiError),
}

pub struct Controller<T: Transport, S: Screen> {
    config: Config,
    transport: T,
    screen: S,
    base_url: String,
    form: FormState,
    /// The posts currently on screen. Edit-mode prefill reads from here, the
    /// same data the rendered blocks carry.
    posts: Vec<Post>,
}

impl<T: Transport, S: Screen> Controller<T, S> {
    pub fn new(config: Config, transport: T, screen: S) -> Self {
        Self {
            config,
            transport,
            screen,
            base_url: String::new(),
            form: FormState::default(),
            posts: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.to_string();
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_title(&mut self, title: &str) {
        self.form.title = title.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.form.content = content.to_string();
    }

    pub fn set_author(&mut self, author: &str) {
        self.form.author = author.to_string();
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn client(&self) -> PostClient {
        PostClient::new(&self.base_url)
    }

    fn round_trip<R>(
        &mut self,
        req: HttpRequest,
        parse: impl FnOnce(&PostClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, RoundTripError> {
        let client = self.client();
        let resp = self
            .transport
            .execute(req)
            .map_err(|_| RoundTripError::Transport)?;
        parse(&client, resp).map_err(RoundTripError::Api)
    }

    /// Adopt the persisted base URL, if any, and load the list right away.
    pub fn startup(&mut self) -> Result<()> {
        if let Some(url) = self.config.load_base_url()? {
            self.base_url = url;
            self.load_posts()?;
        }
        Ok(())
    }

    /// List all posts. Persists the current base-URL value before the request
    /// goes out, so the stored preference always matches what was last used.
    pub fn load_posts(&mut self) -> Result<()> {
        self.config
            .save_base_url(&self.base_url)
            .context("Failed to persist base URL")?;

        let req = self.client().build_list_posts();
        match self.round_trip(req, |c, r| c.parse_list_posts(r)) {
            Ok(posts) => {
                self.posts = posts;
                self.screen.show_posts(&self.posts);
            }
            Err(_) => self.screen.show_feedback("Error loading posts", true),
        }
        Ok(())
    }

    /// The one submit button: create or update depending on the form mode.
    pub fn submit(&mut self) -> Result<()> {
        match self.form.mode {
            FormMode::Create => self.add_post(),
            FormMode::Editing(id) => self.update_post(id),
        }
    }

    fn add_post(&mut self) -> Result<()> {
        let req = match self.client().build_create_post(&self.form.input()) {
            Ok(req) => req,
            Err(_) => {
                self.screen
                    .show_feedback("Title, content, and author are required.", true);
                return Ok(());
            }
        };
        match self.round_trip(req, |c, r| c.parse_create_post(r)) {
            Ok(_) => {
                self.screen.show_feedback("Post added successfully", false);
                self.load_posts()?;
            }
            Err(_) => self.screen.show_feedback("Error adding post", true),
        }
        Ok(())
    }

    fn update_post(&mut self, id: u64) -> Result<()> {
        let req = match self.client().build_update_post(id, &self.form.input()) {
            Ok(req) => req,
            Err(_) => {
                self.screen
                    .show_feedback("Title, content, and author are required.", true);
                return Ok(());
            }
        };
        match self.round_trip(req, |c, r| c.parse_update_post(r)) {
            Ok(_) => {
                self.screen.show_feedback("Post updated successfully", false);
                self.load_posts()?;
                // Submit goes back to creating; a failed update stays in
                // edit mode so the user can retry.
                self.form.mode = FormMode::Create;
            }
            Err(_) => self.screen.show_feedback("Error updating post", true),
        }
        Ok(())
    }

    pub fn delete_post(&mut self, id: u64) -> Result<()> {
        let req = self.client().build_delete_post(id);
        match self.round_trip(req, |c, r| c.parse_delete_post(r)) {
            Ok(()) => {
                self.screen.show_feedback("Post deleted successfully", false);
                self.load_posts()?;
            }
            Err(_) => self.screen.show_feedback("Error deleting post", true),
        }
        Ok(())
    }

    pub fn search_posts(&mut self, field: SearchField, query: &str) {
        let req = match self.client().build_search_posts(field, query) {
            Ok(req) => req,
            Err(_) => {
                self.screen.show_feedback("Please enter a search query.", true);
                return;
            }
        };
        match self.round_trip(req, |c, r| c.parse_search_posts(r)) {
            // Nothing matched: the previous render stays untouched, only the
            // feedback line changes.
            Ok(posts) if posts.is_empty() => {
                self.screen
                    .show_feedback("No posts found for the given query.", true);
            }
            Ok(posts) => {
                self.posts = posts;
                self.screen.show_posts(&self.posts);
            }
            Err(_) => self.screen.show_feedback("Error searching posts", true),
        }
    }

    pub fn sort_posts(&mut self, field: SortField, direction: SortDirection) {
        let req = self.client().build_sort_posts(field, direction);
        match self.round_trip(req, |c, r| c.parse_sort_posts(r)) {
            Ok(posts) => {
                self.posts = posts;
                self.screen.show_posts(&self.posts);
            }
            Err(RoundTripError::Api(ApiError::UnexpectedFormat)) => {
                self.screen
                    .show_feedback("Unexpected response format from server.", true);
            }
            Err(_) => self.screen.show_feedback("Error sorting posts", true),
        }
    }

    /// Prefill the form from the rendered list and switch the submit action
    /// to update the chosen post. Issues no request.
    pub fn edit_post(&mut self, id: u64) {
        let Some(post) = self.posts.iter().find(|p| p.id == id) else {
            self.screen
                .show_feedback(&format!("No post with ID {id} in the current list."), true);
            return;
        };
        self.form.title = post.title.clone();
        self.form.content = post.content.clone();
        self.form.author = post.author.clone();
        self.form.mode = FormMode::Editing(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use blog_core::HttpMethod;

    use crate::transport::TransportError;

    #[derive(Default)]
    struct FakeTransport {
        responses: VecDeque<Result<HttpResponse, TransportError>>,
        requests: Vec<HttpRequest>,
    }

    impl FakeTransport {
        fn push_ok(&mut self, status: u16, body: &str) {
            self.responses.push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
        }

        fn push_err(&mut self) {
            self.responses
                .push_back(Err(TransportError("connection refused".to_string())));
        }
    }

    impl Transport for Rc<RefCell<FakeTransport>> {
        fn execute(&mut self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut fake = self.borrow_mut();
            fake.requests.push(req);
            fake.responses.pop_front().expect("unexpected request")
        }
    }

    #[derive(Default)]
    struct RecordingScreen {
        renders: Vec<Vec<Post>>,
        feedback: Vec<(String, bool)>,
    }

    impl Screen for Rc<RefCell<RecordingScreen>> {
        fn show_posts(&mut self, posts: &[Post]) {
            self.borrow_mut().renders.push(posts.to_vec());
        }

        fn show_feedback(&mut self, message: &str, is_error: bool) {
            self.borrow_mut().feedback.push((message.to_string(), is_error));
        }
    }

    type TestController = Controller<Rc<RefCell<FakeTransport>>, Rc<RefCell<RecordingScreen>>>;

    struct Harness {
        controller: TestController,
        transport: Rc<RefCell<FakeTransport>>,
        screen: Rc<RefCell<RecordingScreen>>,
        config_dir: std::path::PathBuf,
    }

    fn harness(name: &str) -> Harness {
        let config_dir =
            std::env::temp_dir().join(format!("blog-controller-{}-{name}", std::process::id()));
        let config = Config::at(&config_dir).unwrap();
        let transport = Rc::new(RefCell::new(FakeTransport::default()));
        let screen = Rc::new(RefCell::new(RecordingScreen::default()));
        let mut controller = Controller::new(config, transport.clone(), screen.clone());
        controller.set_base_url("http://localhost:5002/api");
        Harness {
            controller,
            transport,
            screen,
            config_dir,
        }
    }

    fn posts_body() -> &'static str {
        r#"[
            {"id":1,"title":"Hi","content":"World","author":"A","created":"2024-01-01"},
            {"id":2,"title":"Second","content":"More","author":"B","created":"2024-01-02","updated":"2024-02-02"}
        ]"#
    }

    fn post_body(id: u64) -> String {
        format!(
            r#"{{"id":{id},"title":"Hi","content":"World","author":"A","created":"2024-01-01"}}"#
        )
    }

    fn last_feedback(h: &Harness) -> (String, bool) {
        h.screen.borrow().feedback.last().cloned().expect("no feedback shown")
    }

    #[test]
    fn submit_with_missing_field_issues_no_request() {
        let mut h = harness("create-validation");
        h.controller.set_title("Hi");
        h.controller.set_author("A");
        // content left empty

        h.controller.submit().unwrap();

        assert!(h.transport.borrow().requests.is_empty());
        assert_eq!(
            last_feedback(&h),
            ("Title, content, and author are required.".to_string(), true)
        );
    }

    #[test]
    fn update_with_missing_field_issues_no_request() {
        let mut h = harness("update-validation");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();
        h.controller.edit_post(1);
        h.controller.set_title("");

        h.controller.submit().unwrap();

        assert_eq!(h.transport.borrow().requests.len(), 1, "only the list request");
        assert_eq!(
            last_feedback(&h),
            ("Title, content, and author are required.".to_string(), true)
        );
        assert_eq!(h.controller.form().mode, FormMode::Editing(1));
    }

    #[test]
    fn search_with_empty_query_issues_no_request() {
        let mut h = harness("search-validation");

        h.controller.search_posts(SearchField::Title, "");

        assert!(h.transport.borrow().requests.is_empty());
        assert_eq!(
            last_feedback(&h),
            ("Please enter a search query.".to_string(), true)
        );
    }

    #[test]
    fn load_posts_renders_and_persists_base_url() {
        let mut h = harness("load-ok");
        h.transport.borrow_mut().push_ok(200, posts_body());

        h.controller.load_posts().unwrap();

        let screen = h.screen.borrow();
        assert_eq!(screen.renders.len(), 1);
        assert_eq!(screen.renders[0].len(), 2);
        assert_eq!(screen.renders[0][0].title, "Hi");
        assert!(screen.feedback.is_empty());
        drop(screen);

        let stored = Config::at(&h.config_dir).unwrap().load_base_url().unwrap();
        assert_eq!(stored.as_deref(), Some("http://localhost:5002/api"));
    }

    #[test]
    fn load_posts_network_failure_shows_error() {
        let mut h = harness("load-err");
        h.transport.borrow_mut().push_err();

        h.controller.load_posts().unwrap();

        assert!(h.screen.borrow().renders.is_empty());
        assert_eq!(last_feedback(&h), ("Error loading posts".to_string(), true));
    }

    #[test]
    fn add_post_success_reports_then_reloads() {
        let mut h = harness("add-ok");
        h.controller.set_title("Hi");
        h.controller.set_content("World");
        h.controller.set_author("A");
        {
            let mut t = h.transport.borrow_mut();
            t.push_ok(201, &post_body(1));
            t.push_ok(200, posts_body());
        }

        h.controller.submit().unwrap();

        let screen = h.screen.borrow();
        assert_eq!(
            screen.feedback[0],
            ("Post added successfully".to_string(), false)
        );
        assert_eq!(screen.renders.len(), 1, "reload renders the fresh list");
        drop(screen);

        let requests = &h.transport.borrow().requests;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[1].method, HttpMethod::Get);
    }

    #[test]
    fn add_post_server_error_shows_feedback_only() {
        let mut h = harness("add-err");
        h.controller.set_title("Hi");
        h.controller.set_content("World");
        h.controller.set_author("A");
        h.transport.borrow_mut().push_ok(500, "internal error");

        h.controller.submit().unwrap();

        assert_eq!(h.transport.borrow().requests.len(), 1, "no reload after failure");
        assert_eq!(last_feedback(&h), ("Error adding post".to_string(), true));
    }

    #[test]
    fn delete_post_success_reports_then_reloads() {
        let mut h = harness("delete-ok");
        {
            let mut t = h.transport.borrow_mut();
            t.push_ok(200, r#"{"message":"Post with ID 1 has been deleted successfully."}"#);
            t.push_ok(200, "[]");
        }

        h.controller.delete_post(1).unwrap();

        let screen = h.screen.borrow();
        assert_eq!(
            screen.feedback[0],
            ("Post deleted successfully".to_string(), false)
        );
        assert_eq!(screen.renders.len(), 1);
        drop(screen);

        assert_eq!(h.transport.borrow().requests[0].method, HttpMethod::Delete);
    }

    #[test]
    fn delete_post_not_found_shows_error() {
        let mut h = harness("delete-404");
        h.transport.borrow_mut().push_ok(404, r#"{"error":"No post found with ID 9."}"#);

        h.controller.delete_post(9).unwrap();

        assert_eq!(last_feedback(&h), ("Error deleting post".to_string(), true));
    }

    #[test]
    fn search_empty_result_keeps_previous_render() {
        let mut h = harness("search-miss");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();

        h.transport.borrow_mut().push_ok(200, "[]");
        h.controller.search_posts(SearchField::Title, "nomatch");

        let screen = h.screen.borrow();
        assert_eq!(screen.renders.len(), 1, "miss must not re-render or clear");
        assert_eq!(
            screen.feedback.last().unwrap(),
            &("No posts found for the given query.".to_string(), true)
        );
        drop(screen);
        assert_eq!(h.controller.posts().len(), 2, "remembered list unchanged");
    }

    #[test]
    fn search_hit_renders_results() {
        let mut h = harness("search-hit");
        h.transport.borrow_mut().push_ok(
            200,
            r#"[{"id":1,"title":"Hi","content":"World","author":"A","created":"2024-01-01"}]"#,
        );

        h.controller.search_posts(SearchField::Author, "a");

        let screen = h.screen.borrow();
        assert_eq!(screen.renders.len(), 1);
        assert_eq!(screen.renders[0].len(), 1);
    }

    #[test]
    fn sort_non_array_body_shows_format_error_without_render() {
        let mut h = harness("sort-format");
        h.transport.borrow_mut().push_ok(200, r#"{"error":"Invalid sort field."}"#);

        h.controller.sort_posts(SortField::Title, SortDirection::Asc);

        assert!(h.screen.borrow().renders.is_empty());
        assert_eq!(
            last_feedback(&h),
            ("Unexpected response format from server.".to_string(), true)
        );
    }

    #[test]
    fn sort_server_rejection_shows_sort_error() {
        let mut h = harness("sort-400");
        h.transport.borrow_mut().push_ok(
            400,
            r#"{"error":"Invalid direction. Valid options are 'asc' or 'desc'."}"#,
        );

        h.controller.sort_posts(SortField::Title, SortDirection::Asc);

        assert_eq!(last_feedback(&h), ("Error sorting posts".to_string(), true));
    }

    #[test]
    fn sort_success_renders_in_server_order() {
        let mut h = harness("sort-ok");
        h.transport.borrow_mut().push_ok(
            200,
            r#"[
                {"id":2,"title":"Second","content":"More","author":"B","created":"2024-01-02"},
                {"id":1,"title":"Hi","content":"World","author":"A","created":"2024-01-01"}
            ]"#,
        );

        h.controller.sort_posts(SortField::Created, SortDirection::Desc);

        let screen = h.screen.borrow();
        assert_eq!(screen.renders[0][0].id, 2);
        drop(screen);

        let requests = &h.transport.borrow().requests;
        assert!(requests[0].path.ends_with("/posts?direction=desc&sort=created"));
    }

    #[test]
    fn edit_post_prefills_form_without_request() {
        let mut h = harness("edit-prefill");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();

        h.controller.edit_post(2);

        assert_eq!(h.transport.borrow().requests.len(), 1, "edit issues no request");
        let form = h.controller.form();
        assert_eq!(form.title, "Second");
        assert_eq!(form.content, "More");
        assert_eq!(form.author, "B");
        assert_eq!(form.mode, FormMode::Editing(2));
    }

    #[test]
    fn edit_unknown_id_leaves_state_unchanged() {
        let mut h = harness("edit-unknown");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();

        h.controller.edit_post(42);

        assert_eq!(h.controller.form().mode, FormMode::Create);
        assert!(last_feedback(&h).1);
    }

    #[test]
    fn update_success_reverts_to_create_mode() {
        let mut h = harness("update-revert");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();
        h.controller.edit_post(1);
        h.controller.set_title("Hi, revised");
        {
            let mut t = h.transport.borrow_mut();
            t.push_ok(200, &post_body(1)); // PUT
            t.push_ok(200, posts_body()); // reload
        }

        h.controller.submit().unwrap();

        assert_eq!(h.controller.form().mode, FormMode::Create);
        assert_eq!(
            h.screen.borrow().feedback.last().unwrap().0,
            "Post updated successfully"
        );

        // The same submit action now creates instead of updating.
        {
            let mut t = h.transport.borrow_mut();
            t.push_ok(201, &post_body(3));
            t.push_ok(200, posts_body());
        }
        h.controller.submit().unwrap();

        let requests = &h.transport.borrow().requests;
        let created = &requests[requests.len() - 2];
        assert_eq!(created.method, HttpMethod::Post);
        assert!(created.path.ends_with("/posts"));
    }

    #[test]
    fn update_failure_stays_in_edit_mode() {
        let mut h = harness("update-fail");
        h.transport.borrow_mut().push_ok(200, posts_body());
        h.controller.load_posts().unwrap();
        h.controller.edit_post(1);
        h.transport.borrow_mut().push_ok(404, r#"{"error":"No post found with ID 1."}"#);

        h.controller.submit().unwrap();

        assert_eq!(last_feedback(&h), ("Error updating post".to_string(), true));
        assert_eq!(h.controller.form().mode, FormMode::Editing(1));
    }

    #[test]
    fn startup_without_saved_url_stays_idle() {
        let mut h = harness("startup-idle");
        let _ = std::fs::remove_file(h.config_dir.join("base_url.conf"));
        h.controller.set_base_url("");

        h.controller.startup().unwrap();

        assert!(h.transport.borrow().requests.is_empty());
        assert!(h.controller.base_url().is_empty());
    }

    #[test]
    fn startup_with_saved_url_adopts_it_and_lists() {
        let mut h = harness("startup-saved");
        Config::at(&h.config_dir)
            .unwrap()
            .save_base_url("http://saved:1/api")
            .unwrap();
        h.transport.borrow_mut().push_ok(200, "[]");

        h.controller.startup().unwrap();

        assert_eq!(h.controller.base_url(), "http://saved:1/api");
        let requests = &h.transport.borrow().requests;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "http://saved:1/api/posts");
    }
}
