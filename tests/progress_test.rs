mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::*;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn completion_updates_overall_progress() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 4).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    let progress = db
        .complete_lesson(progress_id, lessons[0], None, Some(120), at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(progress.overall_progress, 25);

    let progress = db
        .complete_lesson(progress_id, lessons[1], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(progress.overall_progress, 50);
    assert!(progress.completed_at.is_none());
}

#[tokio::test]
async fn completing_same_lesson_twice_is_idempotent() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 4).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    let first = db
        .complete_lesson(progress_id, lessons[0], Some(90), None, at(2026, 8, 1))
        .await
        .unwrap();
    let second = db
        .complete_lesson(progress_id, lessons[0], Some(10), None, at(2026, 8, 2))
        .await
        .unwrap();

    assert_eq!(first.overall_progress, 25);
    assert_eq!(second.overall_progress, 25);

    let completed = db.completed_lessons(progress_id).await.unwrap();
    assert_eq!(completed.len(), 1);
    // The original completion entry survives the duplicate call.
    assert_eq!(completed[0].score, Some(90));

    // Streak untouched by the no-op second call.
    assert_eq!(second.streak_days, 1);
}

#[tokio::test]
async fn overall_progress_rounds_against_total_lessons() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 3).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    let progress = db
        .complete_lesson(progress_id, lessons[0], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(progress.overall_progress, 33);

    let progress = db
        .complete_lesson(progress_id, lessons[1], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(progress.overall_progress, 67);

    let progress = db
        .complete_lesson(progress_id, lessons[2], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(progress.overall_progress, 100);
    assert!(progress.completed_at.is_some());
}

#[tokio::test]
async fn streak_counts_consecutive_days_and_resets_on_gaps() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 5).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    let p = db
        .complete_lesson(progress_id, lessons[0], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    assert_eq!(p.streak_days, 1);

    let p = db
        .complete_lesson(progress_id, lessons[1], None, None, at(2026, 8, 2))
        .await
        .unwrap();
    assert_eq!(p.streak_days, 2);

    let p = db
        .complete_lesson(progress_id, lessons[2], None, None, at(2026, 8, 3))
        .await
        .unwrap();
    assert_eq!(p.streak_days, 3);

    // Two-day gap resets the streak.
    let p = db
        .complete_lesson(progress_id, lessons[3], None, None, at(2026, 8, 6))
        .await
        .unwrap();
    assert_eq!(p.streak_days, 1);
}

#[tokio::test]
async fn same_day_completions_do_not_double_count() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 3).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    db.complete_lesson(progress_id, lessons[0], None, None, at(2026, 8, 1))
        .await
        .unwrap();
    let p = db
        .complete_lesson(progress_id, lessons[1], None, None, at(2026, 8, 1))
        .await
        .unwrap();

    assert_eq!(p.streak_days, 1);
}

#[tokio::test]
async fn current_lesson_moves_freely() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 2).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    db.set_current_lesson(progress_id, lessons[1], at(2026, 8, 1))
        .await
        .unwrap();
    let progress = db.get_progress(progress_id).await.unwrap();
    assert_eq!(progress.current_lesson_id, Some(lessons[1]));

    db.set_current_lesson(progress_id, lessons[0], at(2026, 8, 2))
        .await
        .unwrap();
    let progress = db.get_progress(progress_id).await.unwrap();
    assert_eq!(progress.current_lesson_id, Some(lessons[0]));
}

#[tokio::test]
async fn notes_upsert_by_lesson() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 2).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    db.upsert_note(progress_id, lessons[0], "first draft", at(2026, 8, 1))
        .await
        .unwrap();
    db.upsert_note(progress_id, lessons[0], "revised", at(2026, 8, 2))
        .await
        .unwrap();
    db.upsert_note(progress_id, lessons[1], "other lesson", at(2026, 8, 2))
        .await
        .unwrap();

    let notes = db.notes(progress_id).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].content, "revised");
    assert!(notes[0].updated_at.is_some());
    assert_eq!(notes[1].content, "other lesson");
    assert!(notes[1].updated_at.is_none());
}

#[tokio::test]
async fn bookmarks_append_and_delete() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 1).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();

    let first = db
        .add_bookmark(progress_id, lessons[0], Some(42), Some("key moment"), at(2026, 8, 1))
        .await
        .unwrap();
    db.add_bookmark(progress_id, lessons[0], Some(90), None, at(2026, 8, 1))
        .await
        .unwrap();

    assert_eq!(db.bookmarks(progress_id).await.unwrap().len(), 2);

    assert!(db.delete_bookmark(progress_id, first).await.unwrap());
    assert!(!db.delete_bookmark(progress_id, first).await.unwrap());
    assert_eq!(db.bookmarks(progress_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn statistics_aggregate_across_courses() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;

    // Course A: completed (1 lesson). Course B: half done (2 lessons).
    let course_a = create_course(&db, instructor, 0, 70).await;
    let lessons_a = add_video_lessons(&db, course_a, 1).await;
    let course_b = create_course(&db, instructor, 0, 70).await;
    let lessons_b = add_video_lessons(&db, course_b, 2).await;

    let progress_a = db
        .create_progress(student, course_a, at(2026, 8, 1))
        .await
        .unwrap();
    let progress_b = db
        .create_progress(student, course_b, at(2026, 8, 1))
        .await
        .unwrap();

    db.complete_lesson(progress_a, lessons_a[0], None, Some(60), at(2026, 8, 1))
        .await
        .unwrap();
    db.complete_lesson(progress_b, lessons_b[0], None, Some(30), at(2026, 8, 1))
        .await
        .unwrap();
    db.complete_lesson(progress_b, lessons_b[1], None, None, at(2026, 8, 2))
        .await
        .unwrap();

    let stats = db.progress_stats(student).await.unwrap();
    assert_eq!(stats.len(), 2);

    let completed: i64 = stats.iter().filter(|s| s.overall_progress == 100).count() as i64;
    assert_eq!(completed, 2);

    let total_lessons: i64 = stats.iter().map(|s| s.lessons_completed).sum();
    assert_eq!(total_lessons, 3);

    let total_time: i64 = stats.iter().map(|s| s.time_spent).sum();
    assert_eq!(total_time, 90);

    let max_streak = stats.iter().map(|s| s.streak_days).max().unwrap();
    assert_eq!(max_streak, 2);
}

#[tokio::test]
async fn deleting_a_lesson_updates_course_count() {
    let db = create_test_db().await;
    let instructor = create_instructor(&db).await;
    let student = create_student(&db).await;
    let course_id = create_course(&db, instructor, 0, 70).await;
    let lessons = add_video_lessons(&db, course_id, 2).await;

    let progress_id = db
        .create_progress(student, course_id, at(2026, 8, 1))
        .await
        .unwrap();
    db.complete_lesson(progress_id, lessons[0], None, None, at(2026, 8, 1))
        .await
        .unwrap();

    assert!(db.delete_lesson(lessons[1], course_id).await.unwrap());
    let course = db.get_course(course_id).await.unwrap().unwrap();
    assert_eq!(course.total_lessons, 1);

    // The next completion recomputes against the new denominator and the
    // completed entry for the deleted lesson would clamp at 100.
    let progress = db
        .complete_lesson(progress_id, lessons[0], None, None, at(2026, 8, 2))
        .await
        .unwrap();
    // Duplicate completion: no recompute, value unchanged.
    assert_eq!(progress.overall_progress, 50);
}
