use std::process;

use anyhow::{Context, Result};
use blog_client::{
    AuthResponse, BlogClient, BlogClientError, Category, Comment, FileTokenStore, Post, PostInput,
    PostPage, TokenStore,
};
use clap::{Parser, Subcommand};

const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "CLI клиент для blog-server")]
struct Cli {
    /// Адрес HTTP-сервера (или переменная окружения `BLOG_SERVER`).
    #[arg(long, global = true, env = "BLOG_SERVER")]
    server: Option<String>,

    /// Файл, в котором хранится JWT-токен.
    #[arg(long, global = true, default_value = FileTokenStore::DEFAULT_FILE)]
    token_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Пользователь текущего токена.
    Me,
    /// Создание поста.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Полная замена поста.
    ///
    /// Если `--content` не указан, используется текущее содержимое поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
    },
    /// Удаление поста.
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Список постов.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    /// Список категорий.
    Categories,
    /// Создание категории.
    CategoryCreate {
        #[arg(long)]
        name: String,
    },
    /// Комментарии поста.
    Comments {
        #[arg(long)]
        post_id: i64,
    },
    /// Добавление комментария.
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },
    /// Удаление комментария.
    CommentDelete {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let store = FileTokenStore::new(&cli.token_file);
    let mut client = BlogClient::new(resolve_server(cli.server)).map_err(map_client_error)?;

    if let Some(token) = store
        .load()
        .with_context(|| format!("не удалось прочитать {}", cli.token_file))?
    {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let auth = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            store
                .save(&auth.access_token)
                .context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            store
                .save(&auth.access_token)
                .context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Logout => {
            store.clear().context("не удалось удалить токен")?;
            println!("Токен удалён");
        }
        Command::Me => {
            let me = client.me().await.map_err(map_client_error)?;
            println!("user_id: {}", me.user_id);
            println!("username: {}", me.username);
        }
        Command::Create {
            title,
            content,
            image,
            category_id,
        } => {
            let input = PostInput {
                title,
                content,
                image,
                category_id,
            };
            let post = client.create_post(&input).await.map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        Command::Update {
            id,
            title,
            content,
            image,
            category_id,
        } => {
            // Если пользователь не передал --content, сохраняем текущее содержимое поста.
            let content = match content {
                Some(content) => content,
                None => client.get_post(id).await.map_err(map_client_error)?.content,
            };

            let input = PostInput {
                title,
                content,
                image,
                category_id,
            };
            let post = client
                .update_post(id, &input)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::List { page, limit } => {
            let list = client
                .list_posts(page, limit)
                .await
                .map_err(map_client_error)?;
            print_list(&list);
        }
        Command::Categories => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            println!("Категорий: {}", categories.len());
            for category in &categories {
                println!("- {}", format_category(category));
            }
        }
        Command::CategoryCreate { name } => {
            let category = client
                .create_category(&name)
                .await
                .map_err(map_client_error)?;
            println!("Категория создана: {}", format_category(&category));
        }
        Command::Comments { post_id } => {
            let comments = client
                .list_comments(post_id)
                .await
                .map_err(map_client_error)?;
            println!("Комментариев: {}", comments.len());
            for comment in &comments {
                println!("- {}", format_comment(comment));
            }
        }
        Command::Comment {
            post_id,
            author,
            content,
        } => {
            let comment = client
                .create_comment(post_id, &author, &content)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий добавлен: {}", format_comment(&comment));
        }
        Command::CommentDelete { post_id, id } => {
            client
                .delete_comment(post_id, id)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий удалён: id={id}");
        }
    }

    Ok(())
}

fn resolve_server(server: Option<String>) -> String {
    let raw = server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized => {
            "требуется авторизация: выполните `blog-cli login ...` или `blog-cli register ...`"
                .to_string()
        }
        BlogClientError::NotFound(message) => format!("не найдено: {message}"),
        BlogClientError::AlreadyExists(message) => format!("уже существует: {message}"),
        BlogClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        BlogClientError::Server(message) => format!("ошибка сервера: {message}"),
        BlogClientError::Http(err) => format!("ошибка HTTP: {err}"),
        BlogClientError::Storage(err) => format!("ошибка хранилища токена: {err}"),
    };
    anyhow::anyhow!(message)
}

fn format_category(category: &Category) -> String {
    format!("[{}] {}", category.id, category.name)
}

fn format_comment(comment: &Comment) -> String {
    format!("[{}] {}: {}", comment.id, comment.author, comment.content)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  username: {}", auth.user.username);
    println!("  email: {}", auth.user.email);
    println!("  created_at: {}", auth.user.created_at);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    if let Some(image) = &post.image {
        println!("image: {image}");
    }
    if let Some(category) = &post.category {
        println!("category: {}", format_category(category));
    }
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_list(list: &PostPage) {
    println!(
        "Постов: {} (page={}/{}, limit={}, total={})",
        list.posts.len(),
        list.page,
        list.total_pages,
        list.limit,
        list.total
    );

    for post in &list.posts {
        match &post.category {
            Some(category) => println!("- [{}] {} ({})", post.id, post.title, category.name),
            None => println!("- [{}] {}", post.id, post.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:5000".to_string());
        assert_eq!(s, "http://127.0.0.1:5000");
    }

    #[test]
    fn resolve_server_defaults_to_local_http() {
        assert_eq!(resolve_server(None), DEFAULT_HTTP_SERVER);
    }

    #[test]
    fn resolve_server_uses_custom_server() {
        assert_eq!(
            resolve_server(Some("localhost:9999".to_string())),
            "http://localhost:9999"
        );
    }

    #[test]
    fn list_command_defaults_to_first_page_of_five() {
        let cli = Cli::try_parse_from(["blog-cli", "list"]).expect("args must parse");
        match cli.command {
            Command::List { page, limit } => {
                assert_eq!(page, 1);
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn category_create_uses_kebab_case_name() {
        let cli = Cli::try_parse_from(["blog-cli", "category-create", "--name", "Rust"])
            .expect("args must parse");
        assert!(matches!(cli.command, Command::CategoryCreate { name } if name == "Rust"));
    }
}
