//! Integration tests for Fabula

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn fabula() -> Command {
        cargo_bin_cmd!("fabula")
    }

    /// Command isolated from the developer's real config and content
    fn fabula_in(dir: &Path) -> Command {
        let mut cmd = fabula();
        cmd.current_dir(dir)
            .env("FABULA_CONFIG", dir.join("fabula-global.toml"))
            .env_remove("GEMINI_API_KEY");
        cmd
    }

    /// Scaffold a content base into `dir` and return it
    fn scaffold(dir: &Path) {
        fabula()
            .args(["init", "--path"])
            .arg(dir)
            .assert()
            .success();
    }

    #[test]
    fn help_displays() {
        fabula()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Storybook generation toolset"));
    }

    #[test]
    fn version_displays() {
        fabula()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("fabula"));
    }

    #[test]
    fn init_scaffolds_content_base() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        assert!(temp.path().join("story.yaml").is_file());
        assert!(temp.path().join("styles.yaml").is_file());
        assert!(temp.path().join("characters/mia.yaml").is_file());
        assert!(temp.path().join("pages/p01-mia.yaml").is_file());
        assert!(temp.path().join(".fabula.toml").is_file());
        assert!(temp.path().join("ref/styles").is_dir());
    }

    #[test]
    fn init_refuses_existing_base() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula()
            .args(["init", "--path"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        fabula()
            .args(["init", "--force", "--path"])
            .arg(temp.path())
            .assert()
            .success();
    }

    #[test]
    fn check_passes_on_scaffold() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        // The scaffold ships no reference images, so warnings are expected
        fabula_in(temp.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Content base is usable"));
    }

    #[test]
    fn check_fails_on_unknown_location() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());
        std::fs::write(
            temp.path().join("pages/p02-mia.yaml"),
            "location: atlantis\nvisual:\n  - Mia swims\ntext: Splash.\n",
        )
        .unwrap();

        fabula_in(temp.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("unknown location 'atlantis'"))
            .stderr(predicate::str::contains("content check failed"));
    }

    #[test]
    fn config_path_prints_toml_path() {
        let temp = TempDir::new().unwrap();
        fabula_in(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_prints_sections() {
        let temp = TempDir::new().unwrap();
        fabula_in(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[generation]"))
            .stdout(predicate::str::contains("[paths]"));
    }

    #[test]
    fn config_set_writes_local_file() {
        let temp = TempDir::new().unwrap();
        fabula_in(temp.path())
            .args(["config", "set", "generation.style", "ink", "--local"])
            .assert()
            .success();

        let written = std::fs::read_to_string(temp.path().join(".fabula.toml")).unwrap();
        assert!(written.contains("style = \"ink\""));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        fabula_in(temp.path())
            .args(["config", "set", "generation.bogus", "1", "--local"])
            .assert()
            .success()
            .stderr(predicate::str::contains("paths.content"));

        assert!(!temp.path().join(".fabula.toml").exists());
    }

    #[test]
    fn versions_empty_output() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .arg("versions")
            .assert()
            .success()
            .stdout(predicate::str::contains("No versions found"));

        fabula_in(temp.path())
            .args(["versions", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn text_prints_story_markdown() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .args(["text", "mia"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Mia's Story"))
            .stdout(predicate::str::contains("### Page 1"))
            .stdout(predicate::str::contains("glowing like a tiny moon"));
    }

    #[test]
    fn text_unknown_character_fails() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .args(["text", "nobody"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Character not found"));
    }

    #[test]
    fn prompt_prints_text_and_artifact_name() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .args(["prompt", "p01-mia"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Mia lifts a glowing lantern"))
            .stdout(predicate::str::contains("fingerprint: "))
            .stdout(predicate::str::contains("artifact: p01-mia-"));
    }

    #[test]
    fn generate_fails_fast_without_api_key() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .arg("generate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("GEMINI_API_KEY"));
    }

    #[test]
    fn book_fails_without_versions() {
        let temp = TempDir::new().unwrap();
        scaffold(temp.path());

        fabula_in(temp.path())
            .args(["book", "mia"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No versions exist"));
    }
}
