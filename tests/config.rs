// ABOUTME: Integration tests for configuration parsing and target resolution.
// ABOUTME: Tests YAML parsing, key normalization, credentials from env, and lookups.

use hephaestus::config::*;
use hephaestus::error::Error;
use hephaestus::registry::Registry;

const TWO_TARGETS: &str = r#"
deployment_root: deploy
targets:
  Deployment Target 1:
    title: Staging
    region: eu-west-1
    cluster: staging
    destination: 123.dkr.ecr.eu-west-1.amazonaws.com
    version: "2"
    services:
      - title: Web
        folder: web
        git: git@github.com:org/web.git
        label: web
      - title: API
        folder: api
        label: api
  production:
    region: us-east-1
    cluster: prod
    destination: 456.dkr.ecr.us-east-1.amazonaws.com/team
    version: 14
    platform: linux/arm64
    reauthenticate: false
    services:
      - title: API
        folder: api
        label: api
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = Config::from_yaml(TWO_TARGETS).unwrap();
        assert_eq!(config.deployment_root.to_str(), Some("deploy"));
        assert_eq!(config.targets.len(), 2);

        let names: Vec<&str> = config.targets.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["deployment_target_1", "production"]);
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_yaml(TWO_TARGETS).unwrap();
        let staging = config.targets.values().next().unwrap();

        assert_eq!(staging.platform, DEFAULT_PLATFORM);
        assert!(staging.reauthenticate);
        assert!(staging.credentials.is_none());
    }

    #[test]
    fn numeric_version_is_accepted() {
        let config = Config::from_yaml(TWO_TARGETS).unwrap();
        let production = config.targets.values().nth(1).unwrap();

        assert_eq!(production.version.as_str(), "14");
        assert_eq!(production.version.tag(), "v14");
        assert!(!production.reauthenticate);
    }

    #[test]
    fn missing_region_is_rejected() {
        let yaml = r#"
targets:
  t:
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn empty_targets_are_rejected() {
        let err = Config::from_yaml("targets: {}\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn uppercase_label_is_rejected() {
        let yaml = r#"
targets:
  t:
    region: eu-west-1
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
    services:
      - title: Web
        folder: web
        label: Web
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn region_starting_with_dash_is_rejected() {
        let yaml = r#"
targets:
  t:
    region: --profile=x
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn nested_folder_is_rejected() {
        let yaml = r#"
targets:
  t:
    region: eu-west-1
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
    services:
      - title: Web
        folder: ../web
        label: web
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn keys_colliding_after_normalization_are_rejected() {
        let yaml = r#"
targets:
  My Target:
    region: eu-west-1
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
  my_target:
    region: eu-west-1
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}

mod duplicates {
    use super::*;

    fn with_services(services: &str) -> String {
        format!(
            "targets:\n  t:\n    region: eu-west-1\n    cluster: c\n    destination: 1.dkr.ecr.eu-west-1.amazonaws.com\n    version: \"1\"\n    services:\n{services}"
        )
    }

    #[test]
    fn exact_duplicates_are_collapsed() {
        let yaml = with_services(
            "      - {title: Web, folder: web, label: web}\n      - {title: Web, folder: web, label: web}\n",
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let target = config.targets.values().next().unwrap();

        assert_eq!(target.services.len(), 2);
        assert_eq!(target.unique_services().len(), 1);
    }

    #[test]
    fn conflicting_titles_are_rejected() {
        let yaml = with_services(
            "      - {title: Web, folder: web, label: web}\n      - {title: Web, folder: other, label: other}\n",
        );
        assert!(matches!(
            Config::from_yaml(&yaml),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn conflicting_labels_are_rejected() {
        let yaml = with_services(
            "      - {title: Web, folder: web, label: web}\n      - {title: Site, folder: site, label: web}\n",
        );
        assert!(Config::from_yaml(&yaml).is_err());
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn finds_config_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), TWO_TARGETS).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.targets.len(), 2);
    }

    #[test]
    fn finds_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".hephaestus")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), TWO_TARGETS).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn init_writes_a_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), false).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
        assert!(matches!(
            init_config(dir.path(), false),
            Err(Error::AlreadyExists(_))
        ));
        init_config(dir.path(), true).unwrap();
    }
}

mod registry {
    use super::*;

    fn registry() -> Registry {
        Registry::new(Config::from_yaml(TWO_TARGETS).unwrap())
    }

    #[test]
    fn resolves_by_normalized_key() {
        let target = registry().resolve("Deployment  Target 1").unwrap();
        assert_eq!(target.name().as_str(), "deployment_target_1");
        assert_eq!(target.title(), "Staging");
    }

    #[test]
    fn resolves_by_title() {
        let target = registry().resolve("staging").unwrap();
        assert_eq!(target.cluster(), "staging");
    }

    #[test]
    fn title_defaults_to_key() {
        let target = registry().resolve("production").unwrap();
        assert_eq!(target.title(), "production");
        assert_eq!(target.platform(), "linux/arm64");
    }

    #[test]
    fn unknown_target_is_reported() {
        let err = registry().resolve("nowhere").unwrap_err();
        assert!(matches!(err, Error::UnknownTarget(ref id) if id == "nowhere"));
        assert!(err.to_string().contains("could not find a matching deployment target"));
    }

    #[test]
    fn services_keep_configuration_order() {
        let services = registry().services("deployment_target_1").unwrap();
        let titles: Vec<&str> = services.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Web", "API"]);
    }

    #[test]
    fn services_by_title_are_sorted() {
        let target = registry().resolve("deployment_target_1").unwrap();
        let titles: Vec<&str> = target.services_by_title().iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["API", "Web"]);
    }

    #[test]
    fn select_keeps_request_order_and_drops_repeats() {
        let target = registry().resolve("deployment_target_1").unwrap();
        let selected = target.select(&["API", "Web", "API"]).unwrap();
        let titles: Vec<&str> = selected.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["API", "Web"]);
    }

    #[test]
    fn select_rejects_unknown_service() {
        let target = registry().resolve("deployment_target_1").unwrap();
        let err = target.select(&["Web", "Worker"]).unwrap_err();
        assert!(matches!(err, Error::UnknownService { ref service, .. } if service == "Worker"));
    }

    #[test]
    fn image_ref_combines_destination_label_and_version() {
        let target = registry().resolve("production").unwrap();
        let api = target.service("API").unwrap();
        let image = target.image_ref(api);

        assert_eq!(
            image.to_string(),
            "456.dkr.ecr.us-east-1.amazonaws.com/team/api:v14"
        );
        assert_eq!(image.local_tag(), "api:v14");
    }

    #[test]
    fn clone_folder_comes_from_git_url() {
        let target = registry().resolve("deployment_target_1").unwrap();
        let web = target.service("Web").unwrap();
        assert_eq!(web.source().map(|s| s.clone_folder()), Some("web"));
        assert!(target.service("API").unwrap().source().is_none());
    }
}

mod credentials {
    use super::*;

    const WITH_CREDENTIALS: &str = r#"
targets:
  t:
    region: eu-west-1
    cluster: c
    destination: 1.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
    credentials:
      access_key_id:
        env: HEPHAESTUS_TEST_KEY_ID
      secret_access_key:
        env: HEPHAESTUS_TEST_SECRET
"#;

    #[test]
    fn credentials_resolve_from_environment() {
        temp_env::with_vars(
            [
                ("HEPHAESTUS_TEST_KEY_ID", Some("AKIA123")),
                ("HEPHAESTUS_TEST_SECRET", Some("s3cret")),
            ],
            || {
                let registry = Registry::new(Config::from_yaml(WITH_CREDENTIALS).unwrap());
                let target = registry.resolve("t").unwrap();
                let credentials = target.credentials().unwrap();

                assert_eq!(credentials.access_key_id, "AKIA123");
                assert!(!format!("{credentials:?}").contains("s3cret"));
                assert!(
                    credentials
                        .to_env()
                        .contains(&("AWS_SECRET_ACCESS_KEY".to_string(), "s3cret".to_string()))
                );
            },
        );
    }

    #[test]
    fn missing_variable_fails_resolution_only() {
        temp_env::with_vars_unset(["HEPHAESTUS_TEST_KEY_ID", "HEPHAESTUS_TEST_SECRET"], || {
            let registry = Registry::new(Config::from_yaml(WITH_CREDENTIALS).unwrap());

            assert!(registry.services("t").is_ok());
            assert!(matches!(
                registry.resolve("t"),
                Err(Error::MissingEnvVar(ref var)) if var == "HEPHAESTUS_TEST_KEY_ID"
            ));
        });
    }

    #[test]
    fn env_value_falls_back_to_default() {
        temp_env::with_var_unset("HEPHAESTUS_TEST_REGION", || {
            let value: EnvValue =
                serde_yaml::from_str("{env: HEPHAESTUS_TEST_REGION, default: eu-west-1}").unwrap();
            assert_eq!(value.resolve().unwrap(), "eu-west-1");
        });
    }
}
