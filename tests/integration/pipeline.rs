//! End-to-end pipeline runs with in-process tools.

use apiserver_gen::classify::DuplicateKindPolicy;
use apiserver_gen::config::GeneratorConfig;
use apiserver_gen::core::GenError;
use apiserver_gen::pipeline::Pipeline;
use apiserver_gen::test_utils::fixtures::{document, main_entry, sample_document};
use apiserver_gen::test_utils::{
    Event, EventLog, FakeGenerator, RecordingRenderer, init_test_logging,
};
use apiserver_gen::tools::TeraRenderer;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use super::template;

fn shipped_templates(config: &mut GeneratorConfig) {
    config.templates.resources = template("resources.tmpl");
    config.templates.clients = template("clients.tmpl");
    config.templates.set = template("set.tmpl");
}

#[tokio::test]
async fn test_every_generation_precedes_every_render() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let log = EventLog::default();
    let pipeline = Pipeline::new(
        GeneratorConfig::new(temp.path()),
        FakeGenerator::new(log.clone()),
        RecordingRenderer::new(log.clone()),
    );

    pipeline.run(&sample_document()).await.unwrap();

    let events = log.events();
    let last_generated = events.iter().rposition(|e| matches!(e, Event::Generated { .. })).unwrap();
    let first_rendered = events.iter().position(|e| matches!(e, Event::Rendered { .. })).unwrap();
    assert!(last_generated < first_rendered);

    // api is skipped, management and catalog are generated in document order
    assert_eq!(
        log.generated(),
        [
            ("management".to_string(), "v1alpha1".to_string()),
            ("catalog".to_string(), "v1alpha1".to_string())
        ]
    );
}

#[tokio::test]
async fn test_generator_receives_synthetic_documents() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::default();
    let pipeline = Pipeline::new(
        GeneratorConfig::new(temp.path()),
        FakeGenerator::new(log.clone()),
        RecordingRenderer::new(log.clone()),
    );
    pipeline.run(&sample_document()).await.unwrap();

    let Some(Event::Generated {
        document,
        output_dir,
        ..
    }) = log.events().into_iter().next()
    else {
        panic!("expected a generation first");
    };
    assert_eq!(output_dir, temp.path().join("models/management/v1alpha1"));

    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["openapi"], "3.0.2");
    assert_eq!(value["paths"], json!({}));
    assert_eq!(value["info"], json!({"title": "API Server specification.", "version": "SNAPSHOT"}));
    let kinds: Vec<&String> = document.schemas().keys().collect();
    assert_eq!(kinds, ["APIServiceSpec", "EnvironmentSpec", "SecretSpec"]);
}

#[tokio::test]
async fn test_descriptors_reflect_generated_models() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::default();
    let pipeline = Pipeline::new(
        GeneratorConfig::new(temp.path()),
        FakeGenerator::new(log.clone()),
        RecordingRenderer::new(log.clone()),
    );
    let summary = pipeline.run(&sample_document()).await.unwrap();
    assert_eq!(summary.models, 4);
    assert_eq!(summary.clients, 4);
    assert_eq!(summary.set_kinds, 4);

    let payloads: Vec<_> =
        log.renders().into_iter().filter(|(_, ctx, _, _)| ctx == "res").map(|r| r.2).collect();

    let api_service = payloads.iter().find(|p| p["kind"] == "APIService").unwrap();
    assert_eq!(api_service["fields"], json!({"spec": false}));

    let environment = payloads.iter().find(|p| p["kind"] == "Environment").unwrap();
    assert_eq!(environment["fields"], json!({"spec": true, "owner": true}));
    assert_eq!(environment["resource"], "environments");

    let secret = payloads.iter().find(|p| p["kind"] == "Secret").unwrap();
    assert_eq!(secret["scoped"], true);
    assert_eq!(secret["scope"], "Environment");
    assert_eq!(secret["scopes"], json!(["Environment"]));

    let set = log.renders().into_iter().find(|(_, ctx, _, _)| ctx == "input").unwrap().2;
    assert_eq!(
        set,
        json!({"set": [
            {"group": "management", "version": "v1alpha1", "kinds": [
                {"kind": "APIService", "scoped": false},
                {"kind": "Environment", "scoped": false},
                {"kind": "Secret", "scoped": true}
            ]},
            {"group": "catalog", "version": "v1alpha1", "kinds": [
                {"kind": "Asset", "scoped": false}
            ]}
        ]})
    );
}

#[tokio::test]
async fn test_tera_renders_shipped_templates() {
    let temp = TempDir::new().unwrap();
    let mut config = GeneratorConfig::new(temp.path());
    shipped_templates(&mut config);

    let pipeline = Pipeline::new(config, FakeGenerator::default(), TeraRenderer);
    pipeline.run(&sample_document()).await.unwrap();

    let model =
        fs::read_to_string(temp.path().join("models/management/v1alpha1/Environment.go")).unwrap();
    assert!(model.contains("package v1alpha1"));
    assert!(model.contains("Spec EnvironmentSpec `json:\"spec\"`"));
    assert!(model.contains("Owner interface{} `json:\"owner\"`"));
    assert!(model.contains("EnvironmentResourceName = \"environments\""));

    // the empty spec is left out of the model
    let api_service =
        fs::read_to_string(temp.path().join("models/management/v1alpha1/APIService.go")).unwrap();
    assert!(!api_service.contains("APIServiceSpec"));

    let secret_client =
        fs::read_to_string(temp.path().join("clients/management/v1alpha1/Secret.go")).unwrap();
    assert!(secret_client.contains("type UnscopedSecretClient struct"));
    let secret_model =
        fs::read_to_string(temp.path().join("models/management/v1alpha1/Secret.go")).unwrap();
    assert!(secret_model.contains("SecretScope = \"Environment\""));

    let set = fs::read_to_string(temp.path().join("clients/set.go")).unwrap();
    assert!(set.contains("EnvironmentManagementV1alpha1 *management_v1alpha1.EnvironmentClient"));
    assert!(set.contains("SecretManagementV1alpha1 *management_v1alpha1.UnscopedSecretClient"));
    assert!(set.contains("AssetCatalogV1alpha1 *catalog_v1alpha1.AssetClient"));

    // generated sub-type models sit next to the rendered ones
    assert!(temp.path().join("models/management/v1alpha1/model_environment_spec.go").exists());
    assert!(!temp.path().join("models/management/v1alpha1/model_api_service_spec.go").exists());
    assert!(!temp.path().join("models/api").exists());
}

#[tokio::test]
async fn test_strict_mode_rejects_duplicate_kind() {
    let temp = TempDir::new().unwrap();
    let mut config = GeneratorConfig::new(temp.path());
    config.duplicate_kinds = DuplicateKindPolicy::Reject;
    let doc = document(json!({
        "management.v1alpha1.Environment": main_entry("management", "v1alpha1", "Environment", json!({})),
        "management.v1alpha1.Environment.v2": main_entry("management", "v1alpha1", "Environment", json!({}))
    }));

    let log = EventLog::default();
    let pipeline =
        Pipeline::new(config, FakeGenerator::new(log.clone()), RecordingRenderer::new(log.clone()));
    let err = pipeline.run(&doc).await.unwrap_err();
    assert!(matches!(
        err.root_cause().downcast_ref::<GenError>(),
        Some(GenError::DuplicateKind { kind, .. }) if kind == "Environment"
    ));
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_overwrite_mode_keeps_last_duplicate() {
    let temp = TempDir::new().unwrap();
    let doc = document(json!({
        "management.v1alpha1.Environment": main_entry("management", "v1alpha1", "Environment", json!({})),
        "management.v1alpha1.Environment.v2": main_entry("management", "v1alpha1", "Environment", json!({
            "owner": {"type": "object"}
        }))
    }));

    let log = EventLog::default();
    let pipeline = Pipeline::new(
        GeneratorConfig::new(temp.path()),
        FakeGenerator::new(log.clone()),
        RecordingRenderer::new(log.clone()),
    );
    let summary = pipeline.run(&doc).await.unwrap();
    assert_eq!(summary.models, 1);
    assert_eq!(log.renders()[0].2["fields"], json!({"owner": true}));
}

#[tokio::test]
async fn test_template_error_aborts_run() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("broken.tmpl");
    fs::write(&broken, "{% for x in %}").unwrap();

    let mut config = GeneratorConfig::new(temp.path().join("out"));
    shipped_templates(&mut config);
    config.templates.clients = broken;

    let pipeline = Pipeline::new(config, FakeGenerator::default(), TeraRenderer);
    let err = pipeline.run(&sample_document()).await.unwrap_err();
    assert!(matches!(
        err.root_cause().downcast_ref::<GenError>(),
        Some(GenError::TemplateError { .. })
    ));
    assert!(!temp.path().join("out/clients/set.go").exists());
}
