use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::BlogClient;
use crate::error::BlogClientResult;
use crate::models::{Category, Post, User};
use crate::token_store::TokenStore;

/// Размер страницы, которую контекст запрашивает у сервера.
pub const FIRST_PAGE_LIMIT: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
/// Состояние, которое контекст раздаёт подписчикам.
pub struct BlogSnapshot {
    /// Посты последней загруженной страницы.
    pub posts: Vec<Post>,
    /// Все категории.
    pub categories: Vec<Category>,
    /// Номер последней загруженной страницы (0, пока ничего не загружено).
    pub page: u32,
    /// Всего страниц по данным сервера.
    pub total_pages: u32,
    /// `true`, пока выполняется загрузка постов.
    pub loading: bool,
    /// Есть ли у клиента JWT-токен.
    pub authenticated: bool,
}

/// Общее состояние клиента: посты, категории и флаг загрузки.
///
/// Создаётся явно через [`BlogContext::init`]; изменения можно получать через
/// [`BlogContext::subscribe`].
pub struct BlogContext {
    client: BlogClient,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<BlogSnapshot>,
}

impl BlogContext {
    /// Подхватывает сохранённый токен и загружает первую страницу постов и
    /// список категорий.
    ///
    /// Ошибки хранилища и загрузки только логируются: контекст создаётся в
    /// любом случае, данные можно дозагрузить позже.
    pub async fn init(mut client: BlogClient, store: Arc<dyn TokenStore>) -> Self {
        match store.load() {
            Ok(Some(token)) => client.set_token(token),
            Ok(None) => debug!("no persisted token"),
            Err(err) => warn!(error = %err, "failed to read persisted token"),
        }

        let snapshot = BlogSnapshot {
            authenticated: client.get_token().is_some(),
            ..BlogSnapshot::default()
        };
        let context = Self {
            client,
            store,
            state: watch::Sender::new(snapshot),
        };

        if let Err(err) = context.fetch_posts(1).await {
            warn!(error = %err, "failed to fetch posts");
        }
        if let Err(err) = context.fetch_categories().await {
            warn!(error = %err, "failed to fetch categories");
        }

        context
    }

    /// Загружает страницу постов (`FIRST_PAGE_LIMIT` на страницу).
    ///
    /// Флаг `loading` сбрасывается и при ошибке; прежние посты при этом остаются.
    pub async fn fetch_posts(&self, page: u32) -> BlogClientResult<()> {
        self.state.send_modify(|state| state.loading = true);

        let result = self.client.list_posts(page, FIRST_PAGE_LIMIT).await;

        self.state.send_modify(|state| {
            state.loading = false;
            if let Ok(listing) = &result {
                state.posts = listing.posts.clone();
                state.page = listing.page;
                state.total_pages = listing.total_pages;
            }
        });
        result.map(|_| ())
    }

    /// Загружает список категорий.
    pub async fn fetch_categories(&self) -> BlogClientResult<()> {
        let categories = self.client.list_categories().await?;
        self.state
            .send_modify(|state| state.categories = categories);
        Ok(())
    }

    /// Входит под пользователем и сохраняет токен в хранилище.
    pub async fn login(&mut self, username: &str, password: &str) -> BlogClientResult<User> {
        let auth = self.client.login(username, password).await?;
        self.remember_token(&auth.access_token)?;
        Ok(auth.user)
    }

    /// Регистрирует пользователя и сохраняет токен в хранилище.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<User> {
        let auth = self.client.register(username, email, password).await?;
        self.remember_token(&auth.access_token)?;
        Ok(auth.user)
    }

    /// Клиент уже держит токен; если сохранить его не удалось, токен
    /// сбрасывается, чтобы клиент и флаг `authenticated` не расходились.
    fn remember_token(&mut self, token: &str) -> BlogClientResult<()> {
        if let Err(err) = self.store.save(token) {
            warn!(error = %err, "failed to persist token");
            self.client.clear_token();
            return Err(err);
        }
        self.state.send_modify(|state| state.authenticated = true);
        Ok(())
    }

    /// Забывает токен в клиенте и в хранилище.
    pub fn logout(&mut self) -> BlogClientResult<()> {
        self.client.clear_token();
        self.store.clear()?;
        self.state.send_modify(|state| state.authenticated = false);
        Ok(())
    }

    /// Копия текущего состояния.
    pub fn snapshot(&self) -> BlogSnapshot {
        self.state.borrow().clone()
    }

    /// Посты последней загруженной страницы.
    pub fn posts(&self) -> Vec<Post> {
        self.state.borrow().posts.clone()
    }

    /// Загруженные категории.
    pub fn categories(&self) -> Vec<Category> {
        self.state.borrow().categories.clone()
    }

    /// Выполняется ли сейчас загрузка постов.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Подписка на изменения состояния.
    pub fn subscribe(&self) -> watch::Receiver<BlogSnapshot> {
        self.state.subscribe()
    }

    /// Клиент, которым пользуется контекст (с актуальным токеном).
    pub fn client(&self) -> &BlogClient {
        &self.client
    }
}
