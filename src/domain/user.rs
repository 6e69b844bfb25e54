use super::enums::TaskStatus;
use super::level::LevelTable;
use super::task::{Task, TaskId};
use tracing::warn;

/// Level change caused by a batch of completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

/// Result of completing a batch of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    /// Tasks that actually moved to Completed
    pub completed: usize,
    pub points_earned: u64,
    pub total_points: u64,
    /// Reported once per batch, however many thresholds were crossed
    pub level_up: Option<LevelUp>,
}

/// The session owner of a task collection and a score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub userid: String,
    pub points: u64,
    pub tasks: Vec<Task>,
}

impl User {
    pub fn new(userid: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            points: 0,
            tasks: Vec::new(),
        }
    }

    /// Build a user from loaded parts, enforcing id uniqueness
    pub fn with_tasks(userid: impl Into<String>, points: u64, tasks: Vec<Task>) -> Self {
        let mut user = Self::new(userid);
        user.points = points;
        for task in tasks {
            user.add_task(task);
        }
        user
    }

    /// Add a task, moving its id upward if another task already holds it.
    /// Past `TaskId::MAX` the search continues from 1.
    /// Returns the id the task ended up with
    pub fn add_task(&mut self, mut task: Task) -> TaskId {
        if self.task(task.id).is_some() {
            let original = task.id;
            while self.task(task.id).is_some() {
                task.id = task.id.checked_add(1).unwrap_or(1);
            }
            warn!(original, reassigned = task.id, "duplicate task id reassigned");
        }
        let id = task.id;
        self.tasks.push(task);
        id
    }

    /// Remove the task with this id. Returns true if one was removed
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove each id independently. Ids no longer present are skipped.
    /// Returns how many tasks were removed
    pub fn remove_tasks(&mut self, ids: &[TaskId]) -> usize {
        ids.iter().filter(|id| self.remove_task(**id)).count()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Add points. Zero is ignored
    pub fn award_points(&mut self, amount: u64) {
        if amount > 0 {
            self.points = self.points.saturating_add(amount);
        }
    }

    pub fn calculate_level(&self, table: &LevelTable) -> u32 {
        table.level_for(self.points)
    }

    /// Mark the given tasks Completed and award `points_per_task` for each
    /// one that actually changed, as a single batch
    pub fn complete_tasks(
        &mut self,
        ids: &[TaskId],
        points_per_task: u64,
        table: &LevelTable,
    ) -> CompletionReport {
        let old_level = self.calculate_level(table);

        let mut completed = 0;
        for id in ids {
            if let Some(task) = self.task_mut(*id) {
                if task.set_status(TaskStatus::Completed) {
                    completed += 1;
                }
            }
        }

        let points_earned = points_per_task.saturating_mul(completed as u64);
        self.award_points(points_earned);

        let new_level = self.calculate_level(table);
        let level_up = (new_level > old_level).then_some(LevelUp {
            from: old_level,
            to: new_level,
        });

        CompletionReport {
            completed,
            points_earned,
            total_points: self.points,
            level_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: TaskId, title: &str) -> Task {
        Task::with_id(id, title.to_string())
    }

    #[test]
    fn test_add_task_keeps_ids_unique() {
        let mut user = User::new("alice");
        assert_eq!(user.add_task(task(10, "A")), 10);
        assert_eq!(user.add_task(task(10, "B")), 11);
        assert_eq!(user.add_task(task(11, "C")), 12);
        assert_eq!(user.tasks.len(), 3);
    }

    #[test]
    fn test_add_task_id_collision_at_max() {
        let mut user = User::new("alice");
        assert_eq!(user.add_task(task(TaskId::MAX, "A")), TaskId::MAX);
        assert_eq!(user.add_task(task(TaskId::MAX, "B")), 1);
        assert_eq!(user.add_task(task(TaskId::MAX, "C")), 2);
    }

    #[test]
    fn test_remove_task() {
        let mut user = User::with_tasks("alice", 0, vec![task(1, "A"), task(2, "B")]);
        assert!(user.remove_task(1));
        assert!(!user.remove_task(1));
        assert_eq!(user.tasks.len(), 1);
        assert_eq!(user.tasks[0].id, 2);
    }

    #[test]
    fn test_remove_tasks_tolerates_missing_ids() {
        let mut user = User::with_tasks("alice", 0, vec![task(1, "A"), task(2, "B"), task(3, "C")]);
        let removed = user.remove_tasks(&[1, 42, 3, 3]);
        assert_eq!(removed, 2);
        assert_eq!(user.tasks.len(), 1);
    }

    #[test]
    fn test_award_points_ignores_zero() {
        let mut user = User::new("alice");
        user.award_points(0);
        assert_eq!(user.points, 0);
        user.award_points(15);
        assert_eq!(user.points, 15);
    }

    #[test]
    fn test_complete_tasks_levels_up_once() {
        let table = LevelTable::default();
        let mut user = User::with_tasks("alice", 95, vec![task(1, "A")]);

        let report = user.complete_tasks(&[1], 10, &table);

        assert_eq!(
            report,
            CompletionReport {
                completed: 1,
                points_earned: 10,
                total_points: 105,
                level_up: Some(LevelUp { from: 1, to: 2 }),
            }
        );
    }

    #[test]
    fn test_complete_tasks_crossing_several_thresholds_reports_once() {
        let table = LevelTable::new(vec![(1, 0), (2, 10), (3, 20), (4, 30)]).unwrap();
        let mut user = User::with_tasks(
            "alice",
            0,
            vec![task(1, "A"), task(2, "B"), task(3, "C")],
        );

        let report = user.complete_tasks(&[1, 2, 3], 10, &table);

        assert_eq!(report.completed, 3);
        assert_eq!(report.level_up, Some(LevelUp { from: 1, to: 4 }));
    }

    #[test]
    fn test_complete_tasks_skips_already_completed() {
        let table = LevelTable::default();
        let mut done = task(1, "A");
        done.status = TaskStatus::Completed;
        let mut user = User::with_tasks("alice", 0, vec![done, task(2, "B")]);

        let report = user.complete_tasks(&[1, 2, 99], 10, &table);

        assert_eq!(report.completed, 1);
        assert_eq!(report.points_earned, 10);
        assert_eq!(report.level_up, None);
        assert_eq!(user.points, 10);
    }
}
