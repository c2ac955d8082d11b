mod common;

use common::TestDb;
use gymdesk_storage::diagnostics::{DiagnosticCheck, Diagnostics};
use gymdesk_storage::migration::MemberConsolidator;

#[tokio::test]
async fn test_member_holding_app_user_id_is_reported() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    let test_db = test_db.with_legacy_schema().await;
    test_db
        .execute(
            "INSERT INTO member (id, first_name, last_name, email) VALUES (1, 'Staff', 'Member', 'staff@example.com');
             INSERT INTO app_user (id, email, full_name, is_active) VALUES
                 (1, 'Pat@Example.com', 'Pat Parent', TRUE),
                 (2, 'coach@example.com', 'Casey Coach', TRUE);",
        )
        .await;

    let summary = MemberConsolidator::new(test_db.db.clone()).run(false).await.unwrap();
    assert_eq!(summary.report(1).map(|r| r.migrated_count), Some(1));
    assert_eq!(summary.report(1).map(|r| r.skipped_count), Some(1));

    let finding = Diagnostics::new(test_db.db.get_connection())
        .run(DiagnosticCheck::DuplicateMembers)
        .await
        .unwrap();

    assert!(!finding.passed());
    assert_eq!(finding.problems, 1);
    assert_eq!(
        finding.details,
        vec!["member 1 (staff@example.com) holds the id of app_user 1 (Pat@Example.com)".to_string()]
    );

    test_db.drop_schema().await;
}

#[tokio::test]
async fn test_clean_consolidation_passes_duplicate_check() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    let test_db = test_db.with_legacy_schema().await;
    test_db
        .execute(
            "INSERT INTO app_user (id, email, full_name, is_active) VALUES (1, ' Pat@Example.com', 'Pat Parent', TRUE);
             INSERT INTO athlete (id, first_name, last_name, date_of_birth) VALUES (5, 'Kid', 'Parent', '2016-03-03');",
        )
        .await;

    MemberConsolidator::new(test_db.db.clone()).run(false).await.unwrap();

    let finding = Diagnostics::new(test_db.db.get_connection())
        .run(DiagnosticCheck::DuplicateMembers)
        .await
        .unwrap();
    assert!(finding.passed(), "{:?}", finding.details);

    test_db.drop_schema().await;
}
