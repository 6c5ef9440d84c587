// ABOUTME: Integration tests for the deploy orchestrator.
// ABOUTME: Covers retry on transient auth errors, time budget, bucket resolution and the site-only path.

mod support;

use renderdeploy::config::StageMode;
use renderdeploy::credentials::rotate;
use renderdeploy::deploy::{DeployErrorKind, deploy, deploy_sites};
use renderdeploy::output::Output;
use renderdeploy::remote::RemoteErrorKind;
use std::time::Duration;
use support::{Call, FakeCloud, fatal, principal, project, region, transient};
use tokio::time::Instant;

mod retry {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_transient_failures() {
        support::init_tracing();
        let cloud = FakeCloud::new().fail_deploy_function([transient(), transient()]);
        let project = project("");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let started = Instant::now();
        let report = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(report.attempts, 3);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeployFunction { .. })),
            3
        );
        assert!(started.elapsed() >= Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_in_later_step_restarts_whole_region_loop() {
        let cloud = FakeCloud::new().fail_deploy_site([transient()]);
        let project = project("  - eu-west-1\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let report = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeployFunction { region, .. } if region == "us-east-1")),
            2
        );
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeployFunction { region, .. } if region == "eu-west-1")),
            1
        );

        // The first region's function survived the failed pass.
        assert!(report.outcomes[0].already_existed);
        assert!(!report.outcomes[1].already_existed);
        assert_eq!(report.outcomes[1].region(), &region("eu-west-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_surfaces_last_transient_error() {
        let cloud = FakeCloud::new().always_fail_deploy_function(transient);
        let project = project("deployTimeoutInSeconds: 1\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let started = Instant::now();
        let err = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Timeout);
        assert!(started.elapsed() > Duration::from_secs(1));

        let last = err.last_error().expect("last transient error is kept");
        assert!(last.is_transient_auth());
        assert_eq!(
            err.remote_source().map(|e| e.kind()),
            Some(RemoteErrorKind::TransientAuth)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn short_backoff_keeps_retrying_until_budget() {
        let cloud = FakeCloud::new().always_fail_deploy_function(transient);
        let project = project("deployTimeoutInSeconds: 1\nretryBackoff: 200ms\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let err = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap_err();

        let attempts = cloud.count(|c| matches!(c, Call::DeployFunction { .. }));
        assert!(attempts > 1);
        assert!(err.to_string().contains(&format!("{attempts} attempt(s)")));
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_error_fails_without_retry() {
        let cloud = FakeCloud::new().always_fail_deploy_function(fatal);
        let project = project("");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let started = Instant::now();
        let err = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Remote);
        assert!(!err.is_transient_auth());
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeployFunction { .. })),
            1
        );
        assert!(started.elapsed() < Duration::from_millis(2500));
    }
}

mod regions {
    use super::*;

    #[tokio::test]
    async fn deploys_regions_in_declared_order_with_lease() {
        let cloud = FakeCloud::new();
        let project = project("  - eu-central-1\nbucketName: renders\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap();

        let deploys: Vec<Call> = cloud
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::ListKeys | Call::CreateKey | Call::Version))
            .collect();

        let key = Some("AKIANEW1".to_string());
        assert_eq!(
            deploys,
            vec![
                Call::DeployFunction {
                    region: "us-east-1".to_string(),
                    key: key.clone(),
                },
                Call::DeploySite {
                    region: "us-east-1".to_string(),
                    bucket: "renders".to_string(),
                    site: "remotion-render-app-4.0.0".to_string(),
                    key: key.clone(),
                },
                Call::DeployFunction {
                    region: "eu-central-1".to_string(),
                    key: key.clone(),
                },
                Call::DeploySite {
                    region: "eu-central-1".to_string(),
                    bucket: "renders".to_string(),
                    site: "remotion-render-app-4.0.0".to_string(),
                    key,
                },
            ]
        );
    }

    #[tokio::test]
    async fn renderer_version_is_read_once_per_cycle() {
        let cloud = FakeCloud::new();
        let project = project("  - eu-west-1\n  - ap-south-1\nsiteId: promo\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();

        let report = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(cloud.count(|c| *c == Call::Version), 1);
        for outcome in &report.outcomes {
            assert_eq!(outcome.site.site_name.as_str(), "promo-4.0.0");
        }
    }
}

mod bucket {
    use super::*;

    async fn deployed_buckets(cloud: &FakeCloud, extra: &str) -> Vec<String> {
        let project = project(extra);
        let lease = rotate(cloud, &principal()).await.unwrap();
        let report = deploy(
            cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap();

        report
            .outcomes
            .iter()
            .map(|o| o.site.bucket_name.to_string())
            .collect()
    }

    #[tokio::test]
    async fn explicit_name_is_used_verbatim() {
        let cloud = FakeCloud::new();
        let buckets = deployed_buckets(&cloud, "bucketName: My-Render.Bucket\n").await;

        assert_eq!(buckets, vec!["My-Render.Bucket"]);
        assert_eq!(
            cloud.count(|c| matches!(c, Call::GetOrCreateBucket { .. })),
            0
        );
    }

    #[tokio::test]
    async fn reference_resolves_against_declared_resources() {
        let cloud = FakeCloud::new();
        let buckets = deployed_buckets(
            &cloud,
            r#"bucketName:
  Ref: RenderBucket
resources:
  RenderBucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: renders-from-template
"#,
        )
        .await;

        assert_eq!(buckets, vec!["renders-from-template"]);
        assert_eq!(
            cloud.count(|c| matches!(c, Call::GetOrCreateBucket { .. })),
            0
        );
    }

    #[tokio::test]
    async fn absent_bucket_is_fetched_per_region() {
        let cloud = FakeCloud::new();
        let buckets = deployed_buckets(&cloud, "  - eu-west-1\n").await;

        assert_eq!(
            buckets,
            vec!["remotionlambda-us-east-1", "remotionlambda-eu-west-1"]
        );
        assert_eq!(
            cloud.count(|c| matches!(c, Call::GetOrCreateBucket { .. })),
            2
        );
    }

    #[tokio::test]
    async fn unresolved_reference_fails_before_any_deploy_call() {
        let cloud = FakeCloud::new();
        let project = project("bucketName:\n  Ref: Missing\n");
        let lease = rotate(&cloud, &principal()).await.unwrap();
        let before = cloud.calls().len();

        let err = deploy(
            &cloud,
            &project.config,
            &project.resources,
            &lease,
            &Output::quiet(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::UnresolvedBucket);
        assert_eq!(cloud.calls().len(), before);
    }
}

mod sites_only {
    use super::*;

    #[tokio::test]
    async fn observing_without_bucket_skips_every_region() {
        let cloud = FakeCloud::new();
        let project = project("  - eu-west-1\n");

        let report = deploy_sites(
            &cloud,
            &project.config,
            &project.resources,
            StageMode::Observing,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert!(report.deployed.is_empty());
        assert_eq!(report.skipped, vec![region("us-east-1"), region("eu-west-1")]);
        assert_eq!(
            cloud.count(|c| matches!(
                c,
                Call::GetOrCreateBucket { .. } | Call::DeploySite { .. } | Call::DeployFunction { .. }
            )),
            0
        );
    }

    #[tokio::test]
    async fn observing_with_bucket_deploys_site_under_ambient_credentials() {
        let cloud = FakeCloud::new();
        let project = project("bucketName: shared-renders\n");

        let report = deploy_sites(
            &cloud,
            &project.config,
            &project.resources,
            StageMode::Observing,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(report.deployed.len(), 1);
        assert!(report.skipped.is_empty());
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeploySite { key: None, .. })),
            1
        );
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeployFunction { .. })),
            0
        );
    }

    #[tokio::test]
    async fn deploying_mode_creates_missing_bucket() {
        let cloud = FakeCloud::new();
        let project = project("");

        let report = deploy_sites(
            &cloud,
            &project.config,
            &project.resources,
            StageMode::Deploying,
            &Output::quiet(),
        )
        .await
        .unwrap();

        assert_eq!(
            report.deployed[0].bucket_name.as_str(),
            "remotionlambda-us-east-1"
        );
    }

    #[tokio::test]
    async fn site_errors_are_not_retried() {
        let cloud = FakeCloud::new().fail_deploy_site([transient()]);
        let project = project("bucketName: shared-renders\n");

        let err = deploy_sites(
            &cloud,
            &project.config,
            &project.resources,
            StageMode::Observing,
            &Output::quiet(),
        )
        .await
        .unwrap_err();

        assert!(err.is_transient_auth());
        assert_eq!(
            cloud.count(|c| matches!(c, Call::DeploySite { .. })),
            1
        );
    }
}
