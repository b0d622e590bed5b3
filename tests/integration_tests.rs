//! Integration tests for loading, composing and rendering spec directories

use std::fs;
use std::path::{Path, PathBuf};

use config_spec::output::{find_stale, write_outputs};
use config_spec::{generate, LoadError, RenderConfig, SchemaError, Settings, Workspace};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn apache_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/apache")
}

fn apache_example() -> String {
    let workspace = Workspace::load(&apache_dir()).expect("Should load demo");
    let report = generate(&workspace, &RenderConfig::default());
    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.generated.len(), 1);
    report.generated[0].contents.clone()
}

/// Lines with leading indentation removed
fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim_start).collect()
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_demo_templates_registered() {
    let workspace = Workspace::load(&apache_dir()).expect("Should load demo");
    assert_eq!(
        workspace.registry.names(),
        vec![
            "init_config",
            "init_config/default",
            "init_config/http",
            "instances",
            "instances/default",
            "instances/http",
            "instances/tags",
            "logs",
        ]
    );
    assert_eq!(workspace.documents.len(), 1);
    assert_eq!(workspace.documents[0].name, "Apache");
}

#[test]
fn test_status_url_rendered_as_required() {
    let example = apache_example();
    let lines = trimmed_lines(&example);

    let header = lines
        .iter()
        .position(|l| *l == "## @param apache_status_url - string - required")
        .expect("Should have status url header");
    assert_eq!(lines[header + 1], "## Status url of your Apache server.");
    assert_eq!(lines[header + 2], "#");
    assert_eq!(
        lines[header + 3],
        "# apache_status_url: http://localhost/server-status?auto"
    );
}

#[test]
fn test_sections_in_declared_order() {
    let example = apache_example();
    let init = example.find("\ninit_config:\n").expect("init_config section");
    let instances = example.find("\ninstances:\n").expect("instances section");
    let logs = example.find("\nlogs:\n").expect("logs section");
    assert!(init < instances && instances < logs);
}

#[test]
fn test_override_scoped_to_instances() {
    let example = apache_example();
    let instances = example.find("\ninstances:\n").unwrap();
    let (init_part, instances_part) = example.split_at(instances);

    assert!(init_part.contains("    # timeout: 10\n"));
    assert!(instances_part.contains("    # timeout: 5\n"));
    assert!(!instances_part.contains("# timeout: 10\n"));
}

#[test]
fn test_instances_nested_under_list_marker() {
    let example = apache_example();
    assert!(example.contains("instances:\n\n  -\n    ## @param apache_status_url - string - required\n"));
}

#[test]
fn test_placeholders_and_defaults() {
    let example = apache_example();
    let lines = trimmed_lines(&example);

    assert!(lines.contains(&"# username: <USERNAME>"));
    assert!(lines.contains(&"## @param auth_type - string - optional - default: basic"));
    assert!(lines.contains(&"## @param timeout - number - optional - default: 10"));
    assert!(lines.contains(&"## @param service - string - optional - default: none"));
}

#[test]
fn test_collections_rendered_as_commented_blocks() {
    let example = apache_example();
    assert!(example.contains(
        "    # tags:\n    #   - <KEY_1>:<VALUE_1>\n    #   - <KEY_2>:<VALUE_2>\n"
    ));
    assert!(example.contains(
        "    # proxy:\n    #   http: http://<PROXY_SERVER_FOR_HTTP>:<PORT>\n    #   https: https://<PROXY_SERVER_FOR_HTTPS>:<PORT>\n    #   no_proxy:\n    #     - <HOSTNAME_1>\n    #     - <HOSTNAME_2>\n"
    ));
}

#[test]
fn test_hidden_option_omitted() {
    let example = apache_example();
    assert!(!example.contains("kerberos_cache"));
}

#[test]
fn test_logs_rendered_verbatim() {
    let example = apache_example();
    let logs = &example[example.find("\nlogs:\n").unwrap() + 1..];
    assert!(logs.starts_with(
        "logs:\n  - type: file\n    path: /var/log/apache2/access.log\n    source: apache\n    service: <SERVICE>\n"
    ));
    assert!(logs.contains("    log_processing_rules:\n      - type: multi_line\n"));
    assert!(logs.ends_with("\n"));
}

#[test]
fn test_write_then_check_round_trip() {
    let workspace = Workspace::load(&apache_dir()).unwrap();
    let settings = Settings::default();
    let report = generate(&workspace, &settings.render);
    let tmp = TempDir::new().unwrap();

    let written = write_outputs(&report.generated, tmp.path(), &settings.output_extension).unwrap();
    assert_eq!(written, vec![tmp.path().join("apache.yaml.example")]);
    assert!(find_stale(&report.generated, tmp.path(), &settings.output_extension)
        .unwrap()
        .is_empty());

    fs::write(&written[0], "stale\n").unwrap();
    assert_eq!(
        find_stale(&report.generated, tmp.path(), &settings.output_extension).unwrap(),
        written
    );
}

#[test]
fn test_unknown_template_isolated_per_file() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "templates/instances/http.yaml",
        "- name: timeout\n  value:\n    type: integer\n    example: 5\n",
    );
    write(
        tmp.path(),
        "spec.yaml",
        r#"
name: Apache
files:
  - name: broken.yaml
    options:
      - template: instances/nope
  - name: apache.yaml
    options:
      - template: instances/http
        overrides:
          value.example: 10
"#,
    );

    let workspace = Workspace::load(tmp.path()).unwrap();
    let report = generate(&workspace, &RenderConfig::default());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "broken.yaml");
    assert_eq!(
        report.failures[0].error,
        SchemaError::UnknownTemplate {
            path: "instances/nope".to_string()
        }
    );
    assert_eq!(report.generated.len(), 1);
    assert!(report.generated[0].contents.contains("# timeout: 10\n"));
}

#[test]
fn test_template_cycle_reported_with_chain() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/t1.yaml", "- template: t2\n");
    write(tmp.path(), "templates/t2.yaml", "- template: t1\n");
    write(
        tmp.path(),
        "spec.yaml",
        "name: Cycle\nfiles:\n  - name: cycle.yaml\n    options:\n      - template: t1\n",
    );

    let workspace = Workspace::load(tmp.path()).unwrap();
    let report = generate(&workspace, &RenderConfig::default());

    let failure = &report.failures[0];
    assert_eq!(
        failure.error,
        SchemaError::CircularTemplate {
            chain: vec!["t1".to_string(), "t2".to_string(), "t1".to_string()]
        }
    );
    assert_eq!(failure.chain, vec!["t1".to_string(), "t2".to_string()]);
    assert!(failure.to_string().contains("cycle.yaml"));
}

#[test]
fn test_duplicate_template_paths_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/tags.yaml", "- name: tags\n  value: {type: array}\n");
    write(tmp.path(), "templates/tags.yml", "- name: tags\n  value: {type: array}\n");

    let result = Workspace::load(tmp.path());
    assert!(matches!(
        result,
        Err(LoadError::Template {
            source: SchemaError::DuplicateTemplate { .. },
            ..
        })
    ));
}

#[test]
fn test_malformed_yaml_names_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "spec.yaml", "name: Apache\nfiles: [\n");

    let err = Workspace::load(tmp.path()).unwrap_err();
    match &err {
        LoadError::Yaml { path, .. } => assert_eq!(path, &tmp.path().join("spec.yaml")),
        other => panic!("Expected Yaml error, got {:?}", other),
    }
    assert!(err.to_string().contains("spec.yaml"));
    assert!(!err.format().is_empty());
}

#[test]
fn test_missing_input_directory() {
    let tmp = TempDir::new().unwrap();
    let result = Workspace::load(&tmp.path().join("missing"));
    assert!(matches!(result, Err(LoadError::Io { .. })));
}
