use study_planner_core::{DueDate, Task, TaskType, Timestamp};

/// `(title, due date, category, completed)` in list order.
const SAMPLE_TASKS: [(&str, &str, TaskType, bool); 10] = [
    ("Teaching Assistant (quizzes)", "2026-02-19", TaskType::Other, false),
    ("Minitab Kurulumu", "2026-02-20", TaskType::Other, false),
    ("SAP Kurulumu", "2026-02-17", TaskType::Other, false),
    ("Lojistikte Planlama ve Modelleme II", "2026-02-19", TaskType::Other, true),
    ("Mühendislik İstatistiği II", "2026-02-20", TaskType::Project, true),
    ("Otomasyon", "2026-02-23", TaskType::Quiz, false),
    ("Numerik Analiz II", "2026-02-24", TaskType::Homework, true),
    ("SAP ile Kurumsal Kaynak Planlaması", "2026-02-24", TaskType::Exam, false),
    ("Simülasyon (AREN temelleri - ilk lab)", "2026-02-24", TaskType::Homework, false),
    ("Simülasyon", "2026-03-03", TaskType::Quiz, false),
];

/// Sample study tasks used to populate an empty planner.
#[must_use]
pub fn default_seed(now: Timestamp) -> Vec<Task> {
    SAMPLE_TASKS
        .iter()
        .map(|&(title, due, kind, completed)| {
            let mut task = Task::create(title, DueDate::new(due), kind, now);
            task.is_completed = completed;
            task
        })
        .collect()
}
