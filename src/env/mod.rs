//! Reinforcement-learning environment over the emulator, game data and movie
//! wrappers.
//!
//! A game lives in its own directory under the games root:
//!
//! ```text
//! <games_root>/<Game>-<Platform>/
//!     rom.<ext>          ROM, named by Platform::rom_name
//!     data.json          RAM variable definitions
//!     scenario.json      reward and done conditions, valid actions
//!     <state_name>       gzip-compressed start state
//! ```

mod controller;
mod frame_stack;
mod gamestate;
mod observation;
mod platform;

use std::path::PathBuf;

pub use controller::Controller;
pub use frame_stack::{FrameStack, STACK_SIZE};
pub use gamestate::GameState;
pub use observation::{OBSERVATION_LEN, OBSERVATION_SIDE, preprocess};
pub use platform::Platform;

use crate::coreinfo;
use crate::emulator::RetroEmulator;
use crate::error::RetroFailure;
use crate::gamedata::RetroGameData;
use crate::movie::RetroMovie;

/// Environment variable overriding the default games root.
pub const GAMES_DIR_ENV: &str = "RETRO_GAMES_DIR";

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Retro(#[from] RetroFailure),

    #[error("action {action} out of range ({num_actions} actions)")]
    InvalidAction { action: usize, num_actions: usize },
}

#[derive(Debug, Clone)]
pub struct RetroEnvConfig {
    /// Directory holding one sub-directory per game.
    pub games_root: PathBuf,
    /// Emulated frames per `step`, at least one.
    pub frame_skip: usize,
    /// File name of the start state inside the game directory.
    pub state_name: String,
    /// When set, every episode is recorded to a BK2 movie in this directory.
    pub record_dir: Option<PathBuf>,
    /// Core description JSON file to register before loading the ROM.
    pub core_info: Option<PathBuf>,
}

impl Default for RetroEnvConfig {
    fn default() -> Self {
        Self {
            games_root: std::env::var_os(GAMES_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("games")),
            frame_skip: 4,
            state_name: "Level1.state".to_string(),
            record_dir: None,
            core_info: None,
        }
    }
}

/// Outcome of `reset` or `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// `STACK_SIZE` preprocessed frames of `OBSERVATION_LEN` values, oldest first.
    pub observation: Vec<f32>,
    pub reward: f32,
    pub is_done: bool,
}

/// An episodic environment with a discrete action space.
pub trait Environment {
    fn step(&mut self, action: usize) -> Result<StepInfo, EnvError>;

    fn reset(&mut self) -> Result<StepInfo, EnvError>;

    fn num_actions(&self) -> usize;
}

pub struct RetroEnv {
    // Dropped first so a recording closes before the emulator goes away.
    movie: Option<RetroMovie>,
    emulator: RetroEmulator,
    data: RetroGameData,
    controller: Controller,
    frame_stack: FrameStack,
    start_state: GameState,
    game_name: String,
    state_label: String,
    frame_skip: usize,
    record_dir: Option<PathBuf>,
    episode: usize,
}

impl RetroEnv {
    /// Load `<game>-<platform>` from the games root.
    pub fn open(config: RetroEnvConfig, game: &str, platform: Platform) -> Result<Self, EnvError> {
        if let Some(path) = &config.core_info {
            let json = std::fs::read_to_string(path)?;
            coreinfo::load_core_info(&json)?;
        }

        let game_name = format!("{game}-{platform}");
        let game_dir = config.games_root.join(&game_name);
        let start_state = GameState::load(game_dir.join(&config.state_name))?;

        let mut emulator = RetroEmulator::new()?;
        emulator.load_rom(game_dir.join(platform.rom_name()))?;

        let mut data = RetroGameData::new()?;
        data.load(game_dir.join("data.json"), game_dir.join("scenario.json"))
            .into_result()?;
        emulator.configure_data(&mut data)?;

        let controller = Controller::new(data.valid_actions().button_combos());
        tracing::info!(
            game = %game_name,
            actions = controller.num_actions(),
            buttons = controller.num_buttons(),
            "environment opened"
        );

        let state_label = config
            .state_name
            .strip_suffix(".state")
            .unwrap_or(&config.state_name)
            .to_string();

        Ok(Self {
            movie: None,
            emulator,
            data,
            controller,
            frame_stack: FrameStack::new(OBSERVATION_LEN),
            start_state,
            game_name,
            state_label,
            frame_skip: config.frame_skip.max(1),
            record_dir: config.record_dir,
            episode: 0,
        })
    }

    /// Restore the start state and begin a new episode.
    pub fn reset(&mut self) -> Result<StepInfo, EnvError> {
        self.emulator.set_state(self.start_state.bytes())?;
        self.emulator.run();
        self.data.reset();
        self.data.update_ram();

        if self.record_dir.is_some() {
            self.start_recording()?;
        }
        self.episode += 1;

        self.frame_stack.clear();
        self.observe(self.data.current_reward())
    }

    /// Hold the buttons of `action` for `frame_skip` frames.
    pub fn step(&mut self, action: usize) -> Result<StepInfo, EnvError> {
        let num_actions = self.num_actions();
        if action >= num_actions {
            return Err(EnvError::InvalidAction { action, num_actions });
        }

        let mask = self.controller.button_mask(action);
        let mut reward = 0.0;
        for _ in 0..self.frame_skip {
            if let Some(movie) = &mut self.movie {
                for (key, &pressed) in mask.iter().enumerate() {
                    movie.set_key(key as u32, pressed != 0);
                }
                movie.step();
            }
            self.emulator.set_button_mask(&mask, 0);
            self.emulator.run();
            self.data.update_ram();
            reward += self.data.current_reward();
        }

        self.observe(reward)
    }

    pub fn num_actions(&self) -> usize {
        self.controller.num_actions()
    }

    pub fn episode_reward(&self) -> f32 {
        self.data.total_reward()
    }

    pub fn is_done(&self) -> bool {
        self.data.is_done()
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn data(&self) -> &RetroGameData {
        &self.data
    }

    /// The current frame as RGB888, with its width and height.
    pub fn screen(&self) -> Result<(Vec<u8>, usize, usize), EnvError> {
        Ok(self.emulator.screen()?)
    }

    fn observe(&mut self, reward: f32) -> Result<StepInfo, EnvError> {
        let (rgb, width, height) = self.emulator.screen()?;
        self.frame_stack.push(preprocess(rgb, width, height)?);
        Ok(StepInfo {
            observation: self.frame_stack.stacked(),
            reward,
            is_done: self.data.is_done(),
        })
    }

    fn start_recording(&mut self) -> Result<(), EnvError> {
        let Some(dir) = &self.record_dir else {
            return Ok(());
        };
        // Close the previous episode before opening the next file.
        self.movie = None;

        let path = dir.join(format!(
            "{}-{}-{:06}.bk2",
            self.game_name, self.state_label, self.episode
        ));
        let mut movie = RetroMovie::open(&path)?;
        movie.configure(&self.emulator, &self.game_name)?;
        movie.set_state(self.start_state.bytes());
        // The frame `reset` emulated.
        movie.step();
        tracing::debug!(movie = %path.display(), episode = self.episode, "recording episode");
        self.movie = Some(movie);
        Ok(())
    }
}

impl Environment for RetroEnv {
    fn step(&mut self, action: usize) -> Result<StepInfo, EnvError> {
        RetroEnv::step(self, action)
    }

    fn reset(&mut self) -> Result<StepInfo, EnvError> {
        RetroEnv::reset(self)
    }

    fn num_actions(&self) -> usize {
        RetroEnv::num_actions(self)
    }
}
