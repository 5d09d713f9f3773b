use serde::Serialize;

use super::error::CoreError;
use super::random::RandomSource;
use super::store::TaskStore;
use super::types::{Difficulty, LearningModule, WeeklyBatch, WeeklyTask};

pub const DEFAULT_TASK_COUNT: usize = 6;
pub const WEEKLY_BATCH_TITLE: &str = "Weekly Plan";

pub fn task_xp(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Expert => 60,
        Difficulty::Intermediate => 40,
        Difficulty::Beginner => 25,
    }
}

/// Picks `min(count, catalog.len())` distinct modules via a Fisher-Yates
/// shuffle and turns each into a task.
///
/// All randomness comes from `rng`; the function has no other inputs.
pub fn generate_weekly_tasks<R>(
    count: usize,
    catalog: &[LearningModule],
    rng: &mut R,
) -> Vec<WeeklyTask>
where
    R: RandomSource + ?Sized,
{
    let take = count.min(catalog.len());
    if take == 0 {
        return Vec::new();
    }

    let mut order: Vec<&LearningModule> = catalog.iter().collect();
    for i in (1..order.len()).rev() {
        let j = rng.next_index(i + 1);
        order.swap(i, j);
    }

    let mut tasks = Vec::with_capacity(take);
    for (slot, module) in order.into_iter().take(take).enumerate() {
        tasks.push(WeeklyTask {
            id: format!("wk-task-{}-{}", slot + 1, module.id),
            title: task_title(module, rng),
            xp: task_xp(module.difficulty()),
            icon: module.icon.clone(),
            module_id: module.id.clone(),
            done: false,
            generated: true,
        });
    }
    tasks
}

fn task_title<R>(module: &LearningModule, rng: &mut R) -> String
where
    R: RandomSource + ?Sized,
{
    let has_topics = !module.topics.is_empty();
    let has_lessons = module.lessons > 0;
    let use_topic = match (has_topics, has_lessons) {
        (true, true) => rng.next_f64() < 0.5,
        (true, false) => true,
        (false, true) => false,
        (false, false) => return format!("Review {}", module.title),
    };

    if use_topic {
        let topic = &module.topics[rng.next_index(module.topics.len())];
        format!("Master {topic} in {}", module.title)
    } else {
        let lesson = rng.next_index(module.lessons as usize) + 1;
        format!("Complete Lesson {lesson} of {}", module.title)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    pub claimed: usize,
    pub xp_awarded: u32,
}

/// Marks one task done. Claiming a task that is already done awards nothing.
pub fn claim_task(batch: &mut WeeklyBatch, task_id: &str) -> Result<ClaimReceipt, CoreError> {
    let Some(task) = batch.tasks.iter_mut().find(|t| t.id == task_id) else {
        return Err(CoreError::TaskNotFound {
            week_id: batch.week_id.clone(),
            task_id: task_id.to_string(),
        });
    };
    if task.done {
        return Ok(ClaimReceipt::default());
    }
    task.done = true;
    Ok(ClaimReceipt {
        claimed: 1,
        xp_awarded: task.xp,
    })
}

pub fn claim_all(batch: &mut WeeklyBatch) -> ClaimReceipt {
    let mut receipt = ClaimReceipt::default();
    for task in batch.tasks.iter_mut().filter(|t| !t.done) {
        task.done = true;
        receipt.claimed += 1;
        receipt.xp_awarded += task.xp;
    }
    receipt
}

pub fn batch_key(week_id: &str) -> String {
    format!("weekly_gen_{week_id}")
}

pub fn load_batch<S>(store: &S, week_id: &str) -> Result<Option<WeeklyBatch>, CoreError>
where
    S: TaskStore + ?Sized,
{
    match store.get(&batch_key(week_id))? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_batch<S>(store: &mut S, batch: &WeeklyBatch) -> Result<(), CoreError>
where
    S: TaskStore + ?Sized,
{
    let raw = serde_json::to_string(batch)?;
    store.set(&batch_key(&batch.week_id), raw)
}

/// Returns the persisted batch for `week_id` when it has tasks; otherwise
/// generates, persists and returns a fresh one.
pub fn load_or_generate<S, R>(
    store: &mut S,
    week_id: &str,
    count: usize,
    catalog: &[LearningModule],
    rng: &mut R,
) -> Result<WeeklyBatch, CoreError>
where
    S: TaskStore + ?Sized,
    R: RandomSource + ?Sized,
{
    if let Some(batch) = load_batch(store, week_id)? {
        if !batch.tasks.is_empty() {
            return Ok(batch);
        }
    }

    let batch = WeeklyBatch {
        week_id: week_id.to_string(),
        title: WEEKLY_BATCH_TITLE.to_string(),
        tasks: generate_weekly_tasks(count, catalog, rng),
    };
    save_batch(store, &batch)?;
    Ok(batch)
}

pub fn claim_persisted<S>(
    store: &mut S,
    week_id: &str,
    task_id: &str,
) -> Result<(WeeklyBatch, ClaimReceipt), CoreError>
where
    S: TaskStore + ?Sized,
{
    let mut batch = require_batch(store, week_id)?;
    let receipt = claim_task(&mut batch, task_id)?;
    if receipt.claimed > 0 {
        save_batch(store, &batch)?;
    }
    Ok((batch, receipt))
}

pub fn claim_all_persisted<S>(
    store: &mut S,
    week_id: &str,
) -> Result<(WeeklyBatch, ClaimReceipt), CoreError>
where
    S: TaskStore + ?Sized,
{
    let mut batch = require_batch(store, week_id)?;
    let receipt = claim_all(&mut batch);
    if receipt.claimed > 0 {
        save_batch(store, &batch)?;
    }
    Ok((batch, receipt))
}

fn require_batch<S>(store: &S, week_id: &str) -> Result<WeeklyBatch, CoreError>
where
    S: TaskStore + ?Sized,
{
    load_batch(store, week_id)?.ok_or_else(|| CoreError::BatchNotFound(week_id.to_string()))
}
