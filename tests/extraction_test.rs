//! End-to-end extraction tests against the in-memory runtime
//!
//! Covers the full path image -> extractor chain -> Procfile codec -> formation,
//! including container lifecycle bookkeeping.

use procfile_extract::runtime::{ImageMetadata, MockRuntime, RuntimeCall};
use procfile_extract::{
    CmdExtractor, ExtractConfig, ExtractContext, ExtractError, FileExtractor, FormationService,
    ImageRef, MultiExtractor, NoOpHandler, ProcfileExtractor, Strategy,
};
use std::sync::Arc;
use tar::{Builder, Header};

fn tarball(path: &str, content: &[u8]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, content).unwrap();
    builder.into_inner().unwrap()
}

fn image() -> ImageRef {
    "remind101/acme-inc:latest".parse().unwrap()
}

fn config() -> ExtractConfig {
    ExtractConfig {
        procfile_name: "Procfile".to_string(),
        call_timeout: None,
        strategies: vec![Strategy::File, Strategy::Cmd],
        log_level: "info".to_string(),
    }
}

fn default_chain(runtime: Arc<MockRuntime>) -> MultiExtractor {
    MultiExtractor::new(vec![
        Box::new(FileExtractor::new(runtime.clone())),
        Box::new(CmdExtractor::new(runtime)),
    ])
}

#[tokio::test]
async fn test_procfile_in_image_root() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .with_archive("Procfile", tarball("Procfile", b"web: rails server")),
    );
    let service = FormationService::with_runtime(runtime.clone(), &config());

    let formation = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap();

    assert_eq!(formation.len(), 1);
    assert_eq!(formation["web"].command.args(), ["rails", "server"]);
    assert_eq!(runtime.removals(), 1);
    assert_eq!(
        runtime.count(|c| matches!(c, RuntimeCall::InspectImage(_))),
        0,
        "CMD extractor must not run after the file extractor succeeded"
    );
}

#[tokio::test]
async fn test_procfile_in_working_dir() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(
                &image(),
                ImageMetadata {
                    cmd: vec!["ignored".into()],
                    working_dir: Some("/app".into()),
                },
            )
            .with_archive(
                "/app/Procfile",
                tarball("Procfile", b"web: bundle exec puma\nworker: bundle exec sidekiq\n"),
            ),
    );
    let service = FormationService::with_runtime(runtime.clone(), &config());

    let formation = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap();

    assert_eq!(formation.len(), 2);
    assert_eq!(formation["worker"].command.args(), ["bundle", "exec", "sidekiq"]);
}

#[tokio::test]
async fn test_extended_procfile_args_kept_verbatim() {
    let procfile = b"web:\n  command:\n  - ./bin/web\n  - --banner\n  - hello world\n";
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .with_archive("Procfile", tarball("Procfile", procfile)),
    );
    let service = FormationService::with_runtime(runtime, &config());

    let formation = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap();
    assert_eq!(
        formation["web"].command.args(),
        ["./bin/web", "--banner", "hello world"]
    );
}

#[tokio::test]
async fn test_cmd_fallback_when_procfile_missing() {
    let runtime = Arc::new(MockRuntime::new().with_image(
        &image(),
        ImageMetadata {
            cmd: vec!["/go/bin/app".into(), "server".into()],
            working_dir: None,
        },
    ));
    let service = FormationService::with_runtime(runtime.clone(), &config());

    let formation = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap();

    assert_eq!(formation.len(), 1);
    assert_eq!(formation["web"].command.args(), ["/go/bin/app", "server"]);
    assert_eq!(
        runtime.calls(),
        vec![
            RuntimeCall::CreateContainer("remind101/acme-inc:latest".into()),
            RuntimeCall::InspectContainer("mock-1".into()),
            RuntimeCall::CopyFromContainer {
                id: "mock-1".into(),
                path: "Procfile".into()
            },
            RuntimeCall::RemoveContainer("mock-1".into()),
            RuntimeCall::InspectImage("remind101/acme-inc:latest".into()),
        ]
    );
}

#[tokio::test]
async fn test_create_failure_aborts_chain() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .failing("create_container"),
    );
    let chain = default_chain(runtime.clone());

    let err = chain
        .extract(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Runtime(_)));
    assert_eq!(runtime.removals(), 0);
    assert_eq!(
        runtime.count(|c| matches!(c, RuntimeCall::InspectImage(_))),
        0,
        "a hard failure must stop the chain"
    );
}

#[tokio::test]
async fn test_unknown_procfile_shape_is_not_found() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .with_archive("Procfile", tarball("Procfile", b"- web\n- worker\n")),
    );
    let service = FormationService::with_runtime(runtime, &config());

    let err = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Procfile not found: unknown Procfile format");
}

#[tokio::test]
async fn test_bad_command_is_fatal() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .with_archive("Procfile", tarball("Procfile", b"web: echo 'unterminated\n")),
    );
    let service = FormationService::with_runtime(runtime, &config());

    let err = service
        .formation(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Formation(_)));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_empty_chain_makes_no_runtime_calls() {
    let runtime = Arc::new(MockRuntime::new().with_image(&image(), ImageMetadata::default()));
    let service = FormationService::with_runtime(
        runtime.clone(),
        &ExtractConfig {
            strategies: Vec::new(),
            ..config()
        },
    );

    let err = service
        .procfile(&ExtractContext::new(), &image(), &NoOpHandler)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoSuitableExtractor));
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn test_each_extraction_uses_its_own_container() {
    let runtime = Arc::new(
        MockRuntime::new()
            .with_image(&image(), ImageMetadata::default())
            .with_archive("Procfile", tarball("Procfile", b"web: ./web")),
    );
    let service = Arc::new(FormationService::with_runtime(runtime.clone(), &config()));

    let (ctx_a, ctx_b) = (ExtractContext::new(), ExtractContext::new());
    let (img_a, img_b) = (image(), image());
    let (a, b) = tokio::join!(
        service.procfile(&ctx_a, &img_a, &NoOpHandler),
        service.procfile(&ctx_b, &img_b, &NoOpHandler),
    );
    assert_eq!(a.unwrap(), b"web: ./web");
    assert_eq!(b.unwrap(), b"web: ./web");

    let mut removed: Vec<String> = runtime
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RuntimeCall::RemoveContainer(id) => Some(id),
            _ => None,
        })
        .collect();
    removed.sort();
    assert_eq!(removed, vec!["mock-1", "mock-2"]);
}
