use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Serve a single request with `status` and `body`, returning the base URL.
fn serve_once(status: u16, body: Vec<u8>) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = tiny_http::Response::from_data(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}/avatar")
}

fn fetcher() -> HttpAvatarFetcher {
    HttpAvatarFetcher::new(FetchConfig::default()).unwrap()
}

#[test]
fn fetches_and_decodes_png() {
    let url = serve_once(200, png_bytes(7, 5));
    let img = fetcher().fetch_avatar(&url).unwrap();
    assert_eq!((img.width(), img.height()), (7, 5));
}

#[test]
fn non_ok_status_is_fetch_error() {
    let url = serve_once(404, b"missing".to_vec());
    let err = fetcher().fetch_avatar(&url).unwrap_err();
    assert!(matches!(err, PosterError::Fetch(_)), "{err}");
    assert!(err.to_string().contains("404"), "{err}");
}

#[test]
fn other_success_codes_are_rejected() {
    let url = serve_once(203, png_bytes(2, 2));
    let err = fetcher().fetch_avatar(&url).unwrap_err();
    assert!(matches!(err, PosterError::Fetch(_)), "{err}");
}

#[test]
fn plain_text_payload_is_decode_error() {
    let url = serve_once(200, b"definitely not pixels".to_vec());
    let err = fetcher().fetch_avatar(&url).unwrap_err();
    assert!(matches!(err, PosterError::Decode(_)), "{err}");
}

#[test]
fn unreachable_host_is_fetch_error() {
    let err = fetcher()
        .fetch_avatar("http://127.0.0.1:1/avatar.png")
        .unwrap_err();
    assert!(matches!(err, PosterError::Fetch(_)), "{err}");
}

#[test]
fn oversized_body_is_fetch_error() {
    let url = serve_once(200, vec![0u8; 4096]);
    let f = HttpAvatarFetcher::new(FetchConfig {
        max_body_bytes: 1024,
        ..FetchConfig::default()
    })
    .unwrap();
    let err = f.fetch_bytes(&url).unwrap_err();
    assert!(matches!(err, PosterError::Fetch(_)), "{err}");
}

#[test]
fn slow_server_hits_timeout() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            std::thread::sleep(std::time::Duration::from_millis(1500));
            let _ = request.respond(tiny_http::Response::from_data(png_bytes(1, 1)));
        }
    });

    let f = HttpAvatarFetcher::new(FetchConfig {
        timeout_ms: 200,
        ..FetchConfig::default()
    })
    .unwrap();
    let err = f.fetch_avatar(&format!("http://{addr}/slow")).unwrap_err();
    assert!(matches!(err, PosterError::Fetch(_)), "{err}");
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: FetchConfig = serde_json::from_str(r#"{"timeout_ms": 2500}"#).unwrap();
    assert_eq!(cfg.timeout_ms, 2500);
    assert_eq!(cfg.max_body_bytes, FetchConfig::default().max_body_bytes);
}
