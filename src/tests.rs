#[cfg(test)]
mod builder_tests {
    use crate::{Config, Pdf, PdfError, PdfOptions, PdfOptionsUpdate};
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.chrome_binary, "/usr/bin/chromium");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.security_token.is_none());
        assert_eq!(config.template_dir, "templates");
    }

    #[test]
    fn test_options_default_is_a4_no_margins() {
        let options = PdfOptions::default();
        assert_eq!(options.margin_top, 0.0);
        assert_eq!(options.margin_bottom, 0.0);
        assert_eq!(options.margin_left, 0.0);
        assert_eq!(options.margin_right, 0.0);
        assert_eq!(options.paper_width, 8.3);
        assert_eq!(options.paper_height, 11.7);
        assert!(options.print_background);
    }

    #[test]
    fn test_options_merge_is_additive() {
        let pdf = Pdf::with_config(Config::default())
            .set_options(PdfOptionsUpdate {
                margin_top: Some(10.0),
                ..Default::default()
            })
            .set_options(PdfOptionsUpdate {
                margin_left: Some(5.0),
                ..Default::default()
            });

        let options = pdf.options();
        assert_eq!(options.margin_top, 10.0);
        assert_eq!(options.margin_left, 5.0);
        // Untouched fields keep their defaults
        assert_eq!(options.margin_bottom, 0.0);
        assert_eq!(options.paper_width, 8.3);
        assert!(options.print_background);
    }

    #[test]
    fn test_source_selection_is_last_write_wins() {
        let pdf = Pdf::from_file("/tmp/some.html").load_url("https://example.com");
        assert_eq!(pdf.source_kind(), Some("url"));

        let pdf = Pdf::from_url("https://example.com").load_html("<p>hi</p>");
        assert_eq!(pdf.source_kind(), Some("html"));
    }

    #[tokio::test]
    async fn test_render_without_source_fails() {
        let mut pdf = Pdf::with_config(Config::default());
        let err = pdf.render().await.unwrap_err();
        assert!(matches!(err, PdfError::InvalidSource));
        assert!(!pdf.is_rendered());
    }

    #[test]
    fn test_phantomjs_emulation_adds_prefer_css_page_size_only() {
        let options = PdfOptions {
            margin_top: 1.0,
            ..Default::default()
        };

        let plain = options.to_print_params(false);
        assert_eq!(plain.prefer_css_page_size, None);

        let emulated = options.to_print_params(true);
        assert_eq!(emulated.prefer_css_page_size, Some(true));
        // Margins and paper size survive the merge untouched
        assert_eq!(emulated.margin_top, Some(1.0));
        assert_eq!(emulated.paper_width, Some(8.3));
        assert_eq!(emulated.paper_height, Some(11.7));
        assert_eq!(emulated.print_background, Some(true));
    }

    #[test]
    fn test_security_token_header_present_iff_configured() {
        let pdf = Pdf::from_url("https://example.com").set_security_token("secret");
        let headers = pdf.prepare_request_headers();
        assert_eq!(headers.get("X-Security-Token").map(String::as_str), Some("secret"));

        let pdf = Pdf::with_config(Config::default()).load_url("https://example.com");
        assert!(!pdf.prepare_request_headers().contains_key("X-Security-Token"));

        // An empty token counts as absent
        let pdf = Pdf::from_url("https://example.com").set_security_token("");
        assert!(!pdf.prepare_request_headers().contains_key("X-Security-Token"));
    }

    #[test]
    fn test_security_token_from_config() {
        let config = Config {
            security_token: Some("from-config".to_string()),
            ..Default::default()
        };
        let pdf = Pdf::with_config(config).load_url("https://example.com");
        assert_eq!(
            pdf.prepare_request_headers().get("X-Security-Token").map(String::as_str),
            Some("from-config")
        );
    }

    #[test]
    fn test_phantomjs_user_agent_only_under_emulation() {
        let pdf = Pdf::from_url("https://example.com");
        assert!(!pdf.prepare_request_headers().contains_key("User-Agent"));

        let pdf = Pdf::from_url("https://example.com").emulate_phantomjs();
        let headers = pdf.prepare_request_headers();
        assert!(headers
            .get("User-Agent")
            .is_some_and(|ua| ua.contains("PhantomJS/2.1.1")));
    }

    #[test]
    fn test_caller_headers_are_preserved() {
        let mut custom = HashMap::new();
        custom.insert("X-Trace-Id".to_string(), "abc123".to_string());

        let pdf = Pdf::from_url("https://example.com")
            .set_request_headers(custom)
            .set_security_token("secret");

        let headers = pdf.prepare_request_headers();
        assert_eq!(headers.get("X-Trace-Id").map(String::as_str), Some("abc123"));
        assert_eq!(headers.get("X-Security-Token").map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_timeout_default_and_override() {
        let pdf = Pdf::with_config(Config::default());
        assert_eq!(pdf.timeout(), Duration::from_secs(30));

        let pdf = pdf.set_timeout(5);
        assert_eq!(pdf.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_chrome_args_generation() {
        let args = crate::get_chrome_args();

        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--ignore-certificate-errors".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-data-dir=")));
    }

    #[test]
    fn test_chrome_args_user_data_dir_is_unique_per_cycle() {
        let first = crate::get_chrome_args();
        let second = crate::get_chrome_args();

        let dir = |args: &[String]| {
            args.iter()
                .find(|a| a.starts_with("--user-data-dir="))
                .cloned()
        };
        assert_ne!(dir(&first), dir(&second));
    }

    #[test]
    fn test_view_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("greeting.html"),
            "<h1>Hello {{ name }}</h1>",
        )
        .unwrap();

        let pdf = Pdf::from_view("greeting.html", serde_json::json!({"name": "World"}))
            .set_template_dir(dir.path());

        let markup = pdf
            .render_view("greeting.html", &serde_json::json!({"name": "World"}))
            .unwrap();
        assert_eq!(markup, "<h1>Hello World</h1>");
    }

    #[tokio::test]
    async fn test_missing_view_template_fails_before_browser_launch() {
        let dir = tempfile::tempdir().unwrap();

        let mut pdf = Pdf::from_view("missing.html", serde_json::json!({}))
            .set_template_dir(dir.path())
            // Poison the binary path: the template error must surface first
            .set_chrome_binary("/nonexistent/chromium");

        let err = pdf.render().await.unwrap_err();
        assert!(matches!(err, PdfError::Template(_)));
    }

    #[test]
    fn test_options_update_deserializes_partial_json() {
        let update: PdfOptionsUpdate =
            serde_json::from_str(r#"{"margin_top": 0.5, "print_background": false}"#).unwrap();
        assert_eq!(update.margin_top, Some(0.5));
        assert_eq!(update.print_background, Some(false));
        assert_eq!(update.paper_width, None);
    }

    // Chrome-dependent tests below; they warn instead of failing when no
    // usable Chrome is installed.

    fn chrome_available() -> bool {
        ["/usr/bin/chromium", "/usr/sbin/chromium", "/usr/bin/chromium-browser"]
            .iter()
            .any(|p| std::path::Path::new(p).exists())
    }

    #[tokio::test]
    async fn test_html_render_cycle() {
        if !chrome_available() {
            eprintln!("Chromium not found, skipping render cycle test");
            return;
        }

        let mut pdf = Pdf::from_html("<html><body><h1>render test</h1></body></html>")
            .set_timeout(20);

        match pdf.output().await {
            Ok(bytes) => {
                assert!(bytes.starts_with(b"%PDF"), "output is not a PDF");
                // Extraction consumes the cycle; the next output starts fresh
                assert!(!pdf.is_rendered());
            }
            Err(e) => {
                eprintln!("Render cycle failed (may be expected in some environments): {e:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_stalled_navigation_surfaces_as_navigation_timeout() {
        if !chrome_available() {
            eprintln!("Chromium not found, skipping navigation timeout test");
            return;
        }

        // Non-routable address: the TCP connect hangs, so the configured
        // bound must fire while navigation is still in flight.
        let mut pdf = Pdf::from_url("http://10.255.255.1/").set_timeout(1);

        let started = std::time::Instant::now();
        match pdf.output().await {
            Err(PdfError::NavigationTimeout(bound)) => {
                assert_eq!(bound, Duration::from_secs(1));
                assert!(
                    started.elapsed() < Duration::from_secs(10),
                    "timeout fired far later than the configured bound"
                );
            }
            Err(e) => {
                // Some networks reject the address outright instead of
                // black-holing it
                eprintln!("Expected a navigation timeout, got: {e:?}");
            }
            Ok(_) => eprintln!("Unexpected success rendering a non-routable host"),
        }
        assert!(!pdf.is_rendered());
    }

    #[tokio::test]
    async fn test_save_writes_pdf_file() {
        if !chrome_available() {
            eprintln!("Chromium not found, skipping save test");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");

        let result = Pdf::from_html("<p>saved</p>").save(&target).await;

        match result {
            Ok(()) => {
                let bytes = std::fs::read(&target).unwrap();
                assert!(bytes.starts_with(b"%PDF"));
            }
            Err(e) => {
                eprintln!("Save failed (may be expected in some environments): {e:?}");
            }
        }
    }
}
