// Criterion benchmarks for the job ranker

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jobmatch::core::{normalize, skills_overlap, Ranker};
use jobmatch::models::{JobPosting, UserProfile};

const SKILL_POOL: &[&str] = &[
    "Python", "SQL", "Machine Learning", "AWS", "Docker", "React", "TypeScript", "Kubernetes",
    "Pandas", "Excel", "Power BI", "Go", "Rust", "Java",
];

const CITIES: &[&str] = &["Johannesburg", "Cape Town", "Durban", "Pretoria"];

fn create_job(id: usize) -> JobPosting {
    let mut job = JobPosting::new(format!("job-{}", id), format!("Engineer {}", id));
    job.location = Some(CITIES[id % CITIES.len()].to_string());
    job.remote = id % 5 == 0;
    job.min_years_experience = Some((id % 7) as u32);
    job.posted_date = Some(Utc::now() - Duration::days((id % 60) as i64));
    job.required_skills = (0..4)
        .map(|offset| SKILL_POOL[(id + offset * 3) % SKILL_POOL.len()].to_string())
        .collect();
    job
}

fn create_profile() -> UserProfile {
    let mut profile = UserProfile::with_skills(["Python", "sql", "ML", "docker", "k8s"]);
    profile.location = Some("Cape Town".to_string());
    profile.years_experience = Some(3);
    profile
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_skill", |b| {
        b.iter(|| normalize(black_box("  Amazon   Web Services ")));
    });

    c.bench_function("skills_overlap", |b| {
        b.iter(|| skills_overlap(black_box("ML"), black_box("machine learning engineering")));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = Ranker::with_default_policy();
    let profile = create_profile();

    let mut group = c.benchmark_group("ranking");

    for job_count in [10, 100, 500, 1000].iter() {
        let jobs: Vec<JobPosting> = (0..*job_count).map(create_job).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(job_count),
            job_count,
            |b, _| {
                b.iter(|| ranker.rank(black_box(&profile), black_box(&jobs), 10));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_ranking);
criterion_main!(benches);
