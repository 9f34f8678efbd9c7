use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub fn post(title: &str, info: &str, labels: &[&str]) -> String {
    let tags: String = labels
        .iter()
        .map(|label| format!(r#"<a href="/search/label/{label}" rel="tag">{label}</a>"#))
        .collect();
    format!(
        r#"<div class="post-outer-container">
  <div class="post">
    <h3 class="post-title entry-title"><a href="/p/{title}.html">{title}</a></h3>
    <img id="z_thumb" src="https://img.test/{title}.png" />
    <div id="z_info" style="display:none">{info}</div>
    <div class="post-footer"><span class="post-labels">{tags}</span></div>
  </div>
</div>"#
    )
}

pub fn listing(posts: &[String], older: Option<&str>) -> String {
    let pager = older
        .map(|href| {
            format!(
                r#"<div class="blog-pager"><a class="blog-pager-older-link" href="{href}">Older Posts</a></div>"#
            )
        })
        .unwrap_or_default();
    format!(
        "<!doctype html>\n<html><body><main>{}</main>{pager}</body></html>",
        posts.concat()
    )
}

pub const LANDING: &str = r#"<!doctype html>
<html>
<body>
  <div id="z_slider">[{"title": "Carousel", "size": "5 MB", "url": "https://dl.test/carousel", "thumbnail": "https://img.test/carousel.png", "c": "Emoji"}]</div>
  <div class="widget Label" id="z_labels">
    <ul>
      <li><a dir="ltr" href="/search/label/Myanmar">Myanmar</a><span dir="ltr">(2)</span></li>
      <li><a dir="ltr" href="/search/label/Featured">Featured</a><span dir="ltr">(1)</span></li>
      <li><a dir="ltr" href="/search/label/Emoji">Emoji</a><span dir="ltr">(3)</span></li>
    </ul>
  </div>
</body>
</html>
"#;

/// Response body for a request path (including query), if the fake blog has one.
pub fn page_for(path: &str) -> Option<String> {
    let body = match path {
        "/" => LANDING.to_owned(),
        "/search/label/Myanmar" => listing(
            &[post(
                "Padauk",
                r#"{"s": "1 MB", "u": "https://dl.test/padauk", "a": "Alice", "a_l": "https://alice.test/1"}"#,
                &["Myanmar"],
            )],
            Some("/search/label/Myanmar?updated-max=2"),
        ),
        "/search/label/Myanmar?updated-max=2" => listing(
            &[post(
                "Pyidaungsu",
                r#"{"size": "2 MB", "url": "https://dl.test/pyidaungsu", "a": "Alice", "a_l": "https://alice.test/2"}"#,
                &["Myanmar"],
            )],
            None,
        ),
        "/search/label/Featured" => listing(
            &[post(
                "Sparkle",
                r#"{"s": "3 MB", "u": "https://dl.test/sparkle", "p": "https://img.test/sparkle-preview.png"}"#,
                &["Featured", "Emoji"],
            )],
            None,
        ),
        "/search/label/Emoji" => listing(
            &[
                post("Smile", r#"{"s": "4 MB", "u": "https://dl.test/smile"}"#, &["Emoji"]),
                post("Corrupt", r#"{"s": "4 MB", "u": "#, &["Emoji"]),
                post("Wink", r#"{"s": "5 MB", "u": "https://dl.test/wink"}"#, &["Emoji"]),
            ],
            None,
        ),
        _ => return None,
    };
    Some(body)
}

pub struct BlogServer {
    pub base_url: String,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BlogServer {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}/", server.server_addr());
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let response = match page_for(request.url()) {
                    Some(body) => {
                        let header = tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"text/html; charset=utf-8"[..],
                        )
                        .expect("build header");
                        tiny_http::Response::from_string(body).with_header(header)
                    }
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown,
            handle: Some(handle),
        }
    }
}

impl Drop for BlogServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
