//! End-to-end pipeline tests.

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use tempfile::TempDir;

use campus_concierge::calendar::CalendarResolver;
use campus_concierge::config::Config;
use campus_concierge::dataset::{ClubDataset, DatasetStore};
use campus_concierge::query::{AnswerSource, Intent, Query, QueryExecutor};
use campus_concierge::search::NO_RESULTS;

/// Write the sample dataset directory used by every test.
pub fn create_datasets() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        (
            "calendar.json",
            r#"[
  {"title": "入学式", "date": "2024-04-05"},
  {"title": "前期授業開始", "date": "2024-04-08"},
  {"title": "夏季休業", "start": "2024-08-10", "end": "2024-09-30"},
  {"title": "後期授業開始", "date": "2024-10-01"}
]"#,
        ),
        (
            "teachers.json",
            r#"{"teachers": [
  {"name": "田中", "department": "工学部", "office_hours": "月曜 3限 (工学部1号館 305)"},
  {"氏名": "比嘉 正", "所属": "理学部", "office_hours": [{"day": "火", "time": "12:00-13:00"}]}
]}"#,
        ),
        (
            "clubs.json",
            r#"[
  {"name": "サッカー部", "活動日": "月水金", "活動場所": "陸上競技場", "詳細": "サッカーの練習と試合"},
  {"name": "軽音楽部", "day": "毎日", "location": "サークル棟", "detail": "バンド活動"}
]"#,
        ),
        (
            "faq.json",
            r#"[
  {"question": "図書館の開館時間は?", "answer": "平日 8:30-22:00"},
  {"question": "学生証の再発行", "answer": "学生課で手続き"}
]"#,
        ),
        ("broken.json", "{ this is not json"),
        ("notes.txt", "ignored"),
    ];
    for (name, content) in files {
        let mut file = File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }
    dir
}

pub fn create_executor(dir: &TempDir) -> QueryExecutor {
    let mut config = Config::default();
    config.data.dir = dir.path().to_string_lossy().to_string();
    let store = Arc::new(DatasetStore::load(config.data_dir()).unwrap());
    QueryExecutor::from_config(store, &config).unwrap()
}

#[test]
fn test_load_skips_broken_files() {
    let dir = create_datasets();
    let store = DatasetStore::load(dir.path()).unwrap();

    assert_eq!(store.dataset_names(), vec!["calendar", "clubs", "faq", "teachers"]);
    let summary = store.summary();
    assert_eq!(summary.calendar_count, 4);
    assert_eq!(summary.faculty_count, 2);
    assert_eq!(summary.club_count, 2);
    assert_eq!(summary.skipped_files, 1);
    assert!(matches!(store.clubs(), ClubDataset::Loaded(c) if c.len() == 2));
}

#[test]
fn test_today_lists_only_entrance_ceremony() {
    let dir = create_datasets();
    let store = Arc::new(DatasetStore::load(dir.path()).unwrap());
    let resolver = CalendarResolver::new(store, FixedOffset::east_opt(9 * 3600).unwrap());

    let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
    let answer = resolver.resolve_on("今日の予定は?", today).into_text();
    assert_eq!(answer, "2024-04-05 の予定:\n- 入学式: 2024-04-05");
}

#[tokio::test]
async fn test_calendar_by_explicit_date() {
    let dir = create_datasets();
    let executor = create_executor(&dir);

    let answer = executor.execute(&Query::new("2024/9/1の予定は?")).await;
    assert_eq!(answer.intent, Intent::Calendar);
    assert_eq!(answer.source, AnswerSource::Resolver);
    assert!(answer.content.contains("夏季休業: 2024-08-10 ~ 2024-09-30"));
}

#[tokio::test]
async fn test_teacher_office_hours() {
    let dir = create_datasets();
    let executor = create_executor(&dir);

    let answer = executor.execute(&Query::new("田中先生のオフィスアワーは?")).await;
    assert_eq!(answer.intent, Intent::Teacher);
    assert_eq!(
        answer.content,
        "工学部 田中 先生のオフィスアワー: 月曜 3限 (工学部1号館 305)"
    );
    assert_eq!(answer.content.lines().count(), 1);
}

#[tokio::test]
async fn test_club_lookup() {
    let dir = create_datasets();
    let executor = create_executor(&dir);

    let answer = executor.execute(&Query::new("サッカー部ある?")).await;
    assert_eq!(answer.intent, Intent::Clubs);
    assert!(answer.content.starts_with("【サッカー部】"));
    assert!(answer.content.contains("場所: 陸上競技場"));
}

#[tokio::test]
async fn test_unclassified_query_uses_fallback_search() {
    let dir = create_datasets();
    let executor = create_executor(&dir);

    let answer = executor.execute(&Query::new("図書館 開館時間")).await;
    assert_eq!(answer.intent, Intent::DataQa);
    assert_eq!(answer.source, AnswerSource::FallbackSearch);
    assert!(answer.content.contains("[faq#0] (一致 2)"));

    let answer = executor.execute(&Query::new("ラーメン屋のおすすめ")).await;
    assert_eq!(answer.source, AnswerSource::NotFound);
    assert_eq!(answer.content, NO_RESULTS);
}

#[tokio::test]
async fn test_identical_queries_identical_answers() {
    let dir = create_datasets();
    let executor = create_executor(&dir);

    for text in ["図書館 学生証", "軽音 バンド", "比嘉先生"] {
        let first = executor.execute(&Query::new(text)).await;
        let second = executor.execute(&Query::new(text)).await;
        assert_eq!(first.content, second.content, "{}", text);
    }
}
