#[cfg(test)]
mod cli {
    use assert_cmd::Command;
    use predicates::str::contains;
    use std::fs;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    const A: &str = "https://a.example/";
    const B: &str = "https://b.example/";

    // Duplicate of the rotating responder in `src/test_utils.rs`,
    // which is not visible to integration tests
    struct Rotation {
        locations: Vec<String>,
        next: AtomicUsize,
    }

    impl Respond for Rotation {
        fn respond(&self, _request: &Request) -> ResponseTemplate {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            let location = &self.locations[i % self.locations.len()];
            ResponseTemplate::new(302).insert_header("Location", location.as_str())
        }
    }

    async fn rotating_server(locations: &[&str]) -> MockServer {
        let mock_server = MockServer::start().await;
        let rotation = Rotation {
            locations: locations.iter().map(|l| l.to_string()).collect(),
            next: AtomicUsize::new(0),
        };
        Mock::given(path("/"))
            .respond_with(rotation)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn main_command() -> Command {
        // this gets the "main" binary name (e.g. `splitdump`)
        let mut cmd =
            Command::cargo_bin(env!("CARGO_PKG_NAME")).expect("Couldn't get cargo package name");
        cmd.arg("--no-progress").arg("--wait").arg("0");
        cmd
    }

    #[tokio::test]
    async fn test_dump_text() {
        let mock_server = rotating_server(&[A, B]).await;

        main_command()
            .arg("--limit")
            .arg("2")
            .arg(mock_server.uri())
            .assert()
            .success()
            .stdout(contains(format!("Dumping urls from: {}", mock_server.uri())))
            .stdout(contains(format!("Found 2 destinations:\n{}\n{}", A, B)));
    }

    #[tokio::test]
    async fn test_dump_raw_eager() {
        let mock_server = rotating_server(&[A, B]).await;

        let output = main_command()
            .arg("--format")
            .arg("raw")
            .arg("--breaker")
            .arg("eager")
            .arg("--limit")
            .arg("1")
            .arg(mock_server.uri())
            .output()
            .expect("Couldn't run splitdump");
        assert!(output.status.success());
        // Eager halts as soon as the only destination known so far was seen once
        assert_eq!(String::from_utf8_lossy(&output.stdout), format!("{}\n", A));
    }

    #[tokio::test]
    async fn test_dump_json_several_urls() {
        let first = rotating_server(&[A]).await;
        let second = rotating_server(&[A, B]).await;

        let output = main_command()
            .arg("--format")
            .arg("json")
            .arg(first.uri())
            .arg(second.uri())
            .output()
            .expect("Couldn't run splitdump");
        assert!(output.status.success());

        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Expected JSON output");
        assert_eq!(
            value,
            serde_json::json!([
                {"url": first.uri(), "destinations": [A], "error": ""},
                {"url": second.uri(), "destinations": [A, B], "error": ""},
            ])
        );
    }

    #[tokio::test]
    async fn test_output_file() {
        let mock_server = rotating_server(&[A, B]).await;
        let dir = tempfile::tempdir().expect("Couldn't create temp dir");
        let report = dir.path().join("report.txt");

        let output = main_command()
            .arg("--format")
            .arg("raw")
            .arg("--breaker")
            .arg("eager")
            .arg("--limit")
            .arg("1")
            .arg("--output")
            .arg(&report)
            .arg(mock_server.uri())
            .output()
            .expect("Couldn't run splitdump");
        assert!(output.status.success());
        assert!(output.stdout.is_empty());

        let contents = fs::read_to_string(&report).expect("Expected report file");
        assert_eq!(contents, A);
    }

    #[tokio::test]
    async fn test_config_file() {
        let mock_server = rotating_server(&[A, B]).await;
        let mut config = tempfile::NamedTempFile::new().expect("Couldn't create config file");
        writeln!(config, "format = \"raw\"\nbreaker = \"eager\"\nlimit = 1")
            .expect("Couldn't write config file");

        let output = main_command()
            .arg("--config")
            .arg(config.path())
            .arg(mock_server.uri())
            .output()
            .expect("Couldn't run splitdump");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), format!("{}\n", A));
    }

    #[tokio::test]
    async fn test_custom_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/"))
            .and(header("x-audit", "split"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", A))
            .mount(&mock_server)
            .await;

        main_command()
            .arg("--headers")
            .arg("x-audit=split")
            .arg("--breaker")
            .arg("eager")
            .arg("--limit")
            .arg("1")
            .arg(mock_server.uri())
            .assert()
            .success()
            .stdout(contains(format!("Found 1 destinations:\n{}", A)));
    }

    #[tokio::test]
    async fn test_missing_location_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        main_command()
            .arg(mock_server.uri())
            .assert()
            .failure()
            .code(2)
            .stdout(contains(format!(
                r#"Error dumping domain on "{}": location is empty"#,
                mock_server.uri()
            )))
            .stdout(contains("(Incomplete)Found 0 destinations:"));
    }

    #[test]
    fn test_malformed_url_fails() {
        main_command()
            .arg("--format")
            .arg("raw")
            .arg("not a url")
            .assert()
            .failure()
            .code(2)
            .stdout(contains(r#"Error dumping domain on "not a url""#));
    }

    #[test]
    fn test_unknown_breaker() {
        main_command()
            .arg("--breaker")
            .arg("sometimes")
            .arg("https://split.to/x")
            .assert()
            .failure()
            .code(1);
    }

    #[test]
    fn test_urls_are_required() {
        main_command().assert().failure();
    }
}
