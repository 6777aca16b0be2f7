//! End-to-end: train headless, save, reload and evaluate without learning

use snake_qlearning::game::{Direction, GameConfig};
use snake_qlearning::modes::{BatchMode, Progress, RunConfig, TrainMode, Trainer};
use snake_qlearning::rl::{AgentConfig, Episode, QAgent, RewardConfig, load_q_table};
use tempfile::TempDir;

fn headless(sessions: usize, seed: u64) -> RunConfig {
    RunConfig {
        sessions,
        visual: false,
        print_terminal: false,
        seed: Some(seed),
        max_steps: Some(2_000),
        ..Default::default()
    }
}

#[test]
fn test_train_save_reload_evaluate() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("model_50.json");

    let config = RunConfig {
        save_path: Some(path.clone()),
        ..headless(50, 7)
    };
    let summary = TrainMode::new(config).unwrap().run().unwrap();
    assert_eq!(summary.sessions, 50);
    assert!(summary.states > 0);

    let (table, report) = load_q_table(&path);
    assert_eq!(table.len(), summary.states);
    assert_eq!(report.discarded, 0);
    assert_eq!(report.metadata.unwrap().sessions_trained, 50);

    // Evaluation never touches the values it was given
    let config = RunConfig {
        load_path: Some(path),
        learn: false,
        ..headless(5, 8)
    };
    let mut trainer = Trainer::new(config).unwrap();
    let before: Vec<_> = {
        let mut rows: Vec<_> = trainer
            .agent()
            .q_table()
            .iter()
            .map(|(s, v)| (*s, *v))
            .collect();
        rows.sort_by_key(|(s, _)| *s);
        rows
    };

    while trainer.advance().unwrap() != Progress::Finished {}

    assert_eq!(trainer.agent().updates(), 0);
    for (state, values) in before {
        assert_eq!(trainer.agent().q_values(&state), Some(&values));
    }
}

#[test]
fn test_agent_learns_across_episodes() {
    let mut agent = QAgent::with_seed(AgentConfig::default(), 3);
    let rewards = RewardConfig::default();
    let game = GameConfig::new(10);

    let mut total_steps = 0;
    for session in 0..20 {
        let mut episode = Episode::start_with_seed(&game, session).unwrap();
        while let Some(outcome) = episode.tick(&mut agent, &rewards).unwrap() {
            assert!(Direction::ALL.contains(&outcome.action));
            if episode.steps() >= 2_000 {
                break;
            }
        }
        total_steps += episode.steps();
    }

    assert_eq!(agent.updates(), total_steps);
    assert!(agent.exploration_rate() < 1.0);
    assert!(agent.exploration_rate() >= agent.config().min_exploration_rate);
}

#[test]
fn test_batch_writes_every_model() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let summaries = BatchMode::new(headless(1, 9), dir.clone(), vec![1, 2, 5])
        .run()
        .unwrap();
    assert_eq!(summaries.len(), 3);

    for count in [1, 2, 5] {
        assert!(BatchMode::model_path(&dir, count).exists());
    }
}
