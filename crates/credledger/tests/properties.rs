//! Property tests: generated credential histories checked against a model
//! of the lifecycle.

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use credledger::perms::Caller;
use credledger::{CredentialRecord, CredentialStatus, ErrorKind, OrgId};
use credledger_testkit::fixtures::{sample_request, OUTSIDER, VERIFIER};
use credledger_testkit::generators::{known_org, lifecycle, org_id};
use credledger_testkit::{request_from_params, IssueParams, LifecycleStep, TestFixture};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime builds")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_public_index_matches_model(params: IssueParams, steps in lifecycle(12)) {
        runtime().block_on(async {
            let fixture = TestFixture::public_index();
            let request = request_from_params(&params);
            let cred = request.id.clone();
            fixture.as_university().issue(request.clone()).await.unwrap();

            let mut status = CredentialStatus::Issued;
            let mut disclosed: BTreeSet<OrgId> = BTreeSet::new();
            let mut committed = 1;

            for step in steps {
                match step {
                    LifecycleStep::Share(target) => {
                        let result = fixture.as_student().share(&cred, &target).await;
                        if status == CredentialStatus::Revoked {
                            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidState);
                        } else {
                            prop_assert!(result.is_ok());
                            if disclosed.insert(target) {
                                committed += 1;
                            }
                            status = CredentialStatus::Shared;
                        }
                    }
                    LifecycleStep::Revoke => {
                        let result = fixture.as_university().revoke(&cred).await;
                        if status == CredentialStatus::Revoked {
                            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidState);
                        } else {
                            prop_assert!(result.is_ok());
                            committed += 1;
                            status = CredentialStatus::Revoked;
                        }
                    }
                    LifecycleStep::Reissue => {
                        let result = fixture.as_university().issue(request.clone()).await;
                        prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::AlreadyExists);
                    }
                    LifecycleStep::Verify(org) => {
                        let result = fixture.act_as(Caller::new(org.clone())).verify(&cred).await;
                        if !disclosed.contains(&org) {
                            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Unauthorized);
                        } else if org.as_str() == OUTSIDER {
                            // Disclosed, but outside the private partition
                            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
                        } else {
                            let record = result.unwrap();
                            prop_assert_eq!(record.status, status);
                            prop_assert_eq!(&record.disclosed_to, &disclosed);
                            prop_assert_eq!(&record.subject_name, &request.subject_name);
                        }
                    }
                }
            }

            let record = fixture.as_university().read(&cred).await.unwrap();
            prop_assert_eq!(record.status, status);
            prop_assert_eq!(record.disclosed_to, disclosed);

            let history = fixture.as_verifier().history(&cred).await.unwrap();
            let seqs: Vec<u64> = history.iter().map(|entry| entry.seq).collect();
            prop_assert_eq!(seqs, (1..=committed).collect::<Vec<u64>>());
            prop_assert_eq!(history.last().map(|entry| entry.status), Some(status));
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_issue_then_read_is_exact(params: IssueParams, two_partition in any::<bool>()) {
        runtime().block_on(async {
            let fixture = if two_partition {
                TestFixture::two_partition()
            } else {
                TestFixture::public_index()
            };
            let request = request_from_params(&params);
            fixture.as_university().issue(request.clone()).await.unwrap();

            let record = fixture.as_university().read(&request.id).await.unwrap();
            prop_assert_eq!(record, CredentialRecord::issue(request));
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_only_the_verifier_verifies_replicas(org in org_id()) {
        prop_assume!(org.as_str() != VERIFIER);

        runtime().block_on(async {
            let fixture = TestFixture::two_partition();
            let request = sample_request("CRED3001");
            let cred = request.id.clone();
            fixture.as_university().issue(request).await.unwrap();
            fixture.as_student().share(&cred, &OrgId::new(VERIFIER)).await.unwrap();
            let record = fixture.as_university().read(&cred).await.unwrap();
            fixture
                .as_verifier()
                .store_for_verifier(&serde_json::to_string(&record).unwrap())
                .await
                .unwrap();

            let result = fixture.act_as(Caller::new(org)).verify(&cred).await;
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Unauthorized);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_revocation_survives_any_shares(targets in prop::collection::vec(known_org(), 0..6)) {
        runtime().block_on(async {
            let fixture = TestFixture::public_index();
            let request = sample_request("CRED3001");
            let cred = request.id.clone();
            fixture.as_university().issue(request).await.unwrap();
            fixture.as_university().revoke(&cred).await.unwrap();

            for target in &targets {
                let result = fixture.as_student().share(&cred, target).await;
                prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidState);
            }

            let record = fixture.as_university().read(&cred).await.unwrap();
            prop_assert_eq!(record.status, CredentialStatus::Revoked);
            prop_assert!(record.disclosed_to.is_empty());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
