//! Deterministic in-process core provider for tests.
//!
//! The fake console renders a gradient that shifts with the frame counter,
//! keeps 16 bytes of RAM (byte 0 is the frame counter, byte 1 latches the
//! low key bits of port 0), and serializes as `frame (u64 LE) ++ RAM`.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, Once};

use serde::Deserialize;

use crate::backend::{
    CoreProvider, Emulator, FrameView, GameData, Movie, MovieOptions, Scenario, install_provider,
};
use crate::coreinfo::{self, CoreInfo};
use crate::emulator::RetroEmulator;
use crate::error::CoreError;

pub const CORE_32: &str = "Fake32";
pub const CORE_16: &str = "Fake16";
pub const FRAME_WIDTH: usize = 6;
pub const FRAME_HEIGHT: usize = 4;
pub const DONE_AT: i64 = 10;

const RAM_SIZE: usize = 16;
const PITCH_PAD: usize = 4;
const PORTS: usize = 2;

pub const CORE_INFO_JSON: &str = r#"{
    "Fake32": {"lib": "fake32", "ext": ["fk32", "md"],
               "buttons": ["B", "A", "MODE", "START", "UP", "DOWN", "LEFT", "RIGHT", "C", "Y", "X", "Z"]},
    "Fake16": {"lib": "fake16", "ext": ["fk16"], "buttons": ["B", "A"]},
    "Fake24": {"lib": "fake24", "ext": ["fk24"], "buttons": ["B"]}
}"#;

pub fn buttons() -> Vec<String> {
    coreinfo::button_list(CORE_32).unwrap_or_default()
}

/// Install the fake provider and its core descriptions (once per process).
pub fn install() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::WARN)
            .try_init();
        let _ = install_provider(FakeProvider);
        coreinfo::load_core_info(CORE_INFO_JSON).expect("fake core info");
    });
}

pub fn write_rom(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"FAKE ROM").unwrap();
    path
}

pub fn loaded_emulator(dir: &Path) -> RetroEmulator {
    let rom = write_rom(dir, "rom.fk32");
    let mut emu = RetroEmulator::new().unwrap();
    emu.load_rom(&rom).unwrap();
    emu
}

pub fn ram_of_state(state: &[u8]) -> &[u8] {
    &state[8..]
}

/// Write `data.json` and `scenario.json`; returns their paths.
pub fn write_game_files(dir: &Path) -> (PathBuf, PathBuf) {
    let data = dir.join("data.json");
    let scenario = dir.join("scenario.json");
    std::fs::write(
        &data,
        r#"{"info": {"score": {"address": 0}, "buttons": {"address": 1}}}"#,
    )
    .unwrap();
    std::fs::write(
        &scenario,
        format!(
            r#"{{"reward": "score", "done_at": {DONE_AT}, "actions": [[0, 16, 32], [0, 64, 128]]}}"#
        ),
    )
    .unwrap();
    (data, scenario)
}

/// A movie file holding `frames` frames of playback input.
pub fn write_playback_movie(dir: &Path, frames: usize) -> PathBuf {
    let path = dir.join(format!("playback-{frames}.bk2"));
    std::fs::write(&path, frames.to_string()).unwrap();
    path
}

pub struct FakeProvider;

impl CoreProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn new_emulator(&self) -> Box<dyn Emulator> {
        Box::new(FakeEmulator::default())
    }

    fn new_game_data(&self) -> Box<dyn GameData> {
        Box::new(FakeGameData::default())
    }

    fn new_scenario(&self) -> Box<dyn Scenario> {
        Box::new(FakeScenario::default())
    }

    fn open_movie(&self, path: &Path, options: MovieOptions) -> Result<Box<dyn Movie>, CoreError> {
        let remaining = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            let frames = text
                .trim()
                .parse::<usize>()
                .map_err(|e| CoreError::rejected("movie", e.to_string()))?;
            Some(frames)
        } else {
            None
        };
        with_log(path, |log| {
            *log = MovieLog {
                options: Some(options),
                ..MovieLog::default()
            }
        });
        Ok(Box::new(FakeMovie {
            path: path.to_path_buf(),
            remaining,
        }))
    }
}

#[derive(Default)]
pub struct FakeEmulator {
    depth: u32,
    loaded: bool,
    frame: u64,
    keys: [u16; PORTS],
    ram: Rc<RefCell<Vec<u8>>>,
    pixels: Vec<u8>,
}

impl FakeEmulator {
    fn pitch(&self) -> usize {
        FRAME_WIDTH * (self.depth as usize / 8) + PITCH_PAD
    }

    fn render(&mut self) {
        let bpp = self.depth as usize / 8;
        let pitch = self.pitch();
        self.pixels = vec![0; pitch * FRAME_HEIGHT];
        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                let v = (self.frame as u32)
                    .wrapping_mul(31)
                    .wrapping_add(x as u32 * 7 + y as u32 * 13);
                let at = y * pitch + x * bpp;
                let bytes = v.wrapping_mul(0x0001_0203).to_ne_bytes();
                self.pixels[at..at + bpp].copy_from_slice(&bytes[..bpp]);
            }
        }
    }
}

impl Emulator for FakeEmulator {
    fn load_rom(&mut self, path: &Path, core: &CoreInfo) -> Result<(), CoreError> {
        std::fs::metadata(path)?;
        self.depth = match core.lib.as_str() {
            "fake16" => 16,
            "fake24" => 24,
            _ => 32,
        };
        self.loaded = true;
        self.frame = 0;
        *self.ram.borrow_mut() = vec![0; RAM_SIZE];
        self.render();
        Ok(())
    }

    fn run(&mut self) {
        if !self.loaded {
            return;
        }
        self.frame += 1;
        {
            let mut ram = self.ram.borrow_mut();
            ram[0] = self.frame as u8;
            ram[1] = self.keys[0] as u8;
        }
        self.render();
    }

    fn serialize(&self) -> Result<Vec<u8>, CoreError> {
        if !self.loaded {
            return Err(CoreError::rejected("serialize", "no ROM loaded"));
        }
        let mut state = self.frame.to_le_bytes().to_vec();
        state.extend_from_slice(&self.ram.borrow());
        Ok(state)
    }

    fn unserialize(&mut self, state: &[u8]) -> Result<(), CoreError> {
        if !self.loaded || state.len() != 8 + RAM_SIZE {
            return Err(CoreError::rejected("state", format!("{} bytes", state.len())));
        }
        let mut frame = [0u8; 8];
        frame.copy_from_slice(&state[..8]);
        self.frame = u64::from_le_bytes(frame);
        self.ram.borrow_mut().copy_from_slice(&state[8..]);
        self.render();
        Ok(())
    }

    fn image_width(&self) -> usize {
        if self.loaded { FRAME_WIDTH } else { 0 }
    }

    fn image_height(&self) -> usize {
        if self.loaded { FRAME_HEIGHT } else { 0 }
    }

    fn image(&self) -> Option<FrameView<'_>> {
        self.loaded.then(|| FrameView {
            depth: self.depth,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            pitch: self.pitch(),
            data: &self.pixels,
        })
    }

    fn set_key(&mut self, port: u32, key: u32, active: bool) {
        let (port, key) = (port as usize, key as usize);
        if port >= PORTS || key >= 16 {
            return;
        }
        if active {
            self.keys[port] |= 1 << key;
        } else {
            self.keys[port] &= !(1 << key);
        }
    }

    fn configure_data(&mut self, data: &mut dyn GameData) -> Result<(), CoreError> {
        let data = data
            .as_any_mut()
            .downcast_mut::<FakeGameData>()
            .ok_or_else(|| CoreError::Unsupported("game data from another provider".into()))?;
        data.ram = Some(Rc::clone(&self.ram));
        Ok(())
    }
}

#[derive(Deserialize)]
struct DataFile {
    info: BTreeMap<String, Variable>,
}

#[derive(Deserialize)]
struct Variable {
    address: usize,
}

#[derive(Default)]
pub struct FakeGameData {
    ram: Option<Rc<RefCell<Vec<u8>>>>,
    snapshot: Vec<u8>,
    variables: BTreeMap<String, usize>,
}

impl GameData for FakeGameData {
    fn load(&mut self, path: &Path) -> Result<(), CoreError> {
        let text = std::fs::read_to_string(path)?;
        let file: DataFile =
            serde_json::from_str(&text).map_err(|e| CoreError::rejected("data", e.to_string()))?;
        self.variables = file.info.into_iter().map(|(k, v)| (k, v.address)).collect();
        Ok(())
    }

    fn update_ram(&mut self) {
        if let Some(ram) = &self.ram {
            self.snapshot = ram.borrow().clone();
        }
    }

    fn lookup_value(&self, name: &str) -> Option<i64> {
        let address = *self.variables.get(name)?;
        self.snapshot.get(address).map(|&b| b as i64)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Game data no fake emulator will accept.
pub struct ForeignData;

impl GameData for ForeignData {
    fn load(&mut self, _path: &Path) -> Result<(), CoreError> {
        Ok(())
    }

    fn update_ram(&mut self) {}

    fn lookup_value(&self, _name: &str) -> Option<i64> {
        None
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Deserialize)]
struct ScenarioFile {
    reward: Option<String>,
    done_at: Option<i64>,
    #[serde(default)]
    actions: Vec<Vec<i32>>,
}

#[derive(Default)]
pub struct FakeScenario {
    reward: Option<String>,
    done_at: Option<i64>,
    actions: BTreeMap<i32, BTreeSet<i32>>,
    last: Option<i64>,
    current: f32,
    total: f32,
    done: bool,
}

impl FakeScenario {
    fn reward_value(&self, data: &dyn GameData) -> Option<i64> {
        data.lookup_value(self.reward.as_deref()?)
    }
}

impl Scenario for FakeScenario {
    fn load(&mut self, path: &Path, _data: &dyn GameData) -> Result<(), CoreError> {
        let text = std::fs::read_to_string(path)?;
        let file: ScenarioFile =
            serde_json::from_str(&text).map_err(|e| CoreError::rejected("scenario", e.to_string()))?;
        self.reward = file.reward;
        self.done_at = file.done_at;
        self.actions = file
            .actions
            .into_iter()
            .enumerate()
            .map(|(key, values)| (key as i32, values.into_iter().collect()))
            .collect();
        Ok(())
    }

    fn restart(&mut self) {
        self.last = None;
        self.current = 0.0;
        self.total = 0.0;
        self.done = false;
    }

    fn reload_scripts(&mut self, _data: &dyn GameData) {}

    fn update(&mut self, data: &dyn GameData) {
        let previous = self.last.unwrap_or(0);
        let value = self.reward_value(data).unwrap_or(previous);
        self.current = (value - previous) as f32;
        self.total += self.current;
        self.last = Some(value);
        self.done = self.done_at.is_some_and(|at| value >= at);
    }

    fn current_reward(&self, agent: u32) -> f32 {
        if agent == 0 { self.current } else { 0.0 }
    }

    fn total_reward(&self, agent: u32) -> f32 {
        if agent == 0 { self.total } else { 0.0 }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn valid_actions(&self) -> BTreeMap<i32, BTreeSet<i32>> {
        self.actions.clone()
    }
}

/// Everything a fake movie was told, keyed by its path.
#[derive(Debug, Clone, Default)]
pub struct MovieLog {
    pub options: Option<MovieOptions>,
    pub steps: usize,
    pub closes: usize,
    pub game: Option<String>,
    pub core: Option<String>,
    pub keymap: Vec<String>,
    pub keys: Vec<(u32, bool, u32)>,
    pub state: Vec<u8>,
}

static MOVIES: LazyLock<Mutex<HashMap<PathBuf, MovieLog>>> = LazyLock::new(Default::default);

fn with_log(path: &Path, f: impl FnOnce(&mut MovieLog)) {
    let mut movies = MOVIES.lock().unwrap_or_else(|e| e.into_inner());
    f(movies.entry(path.to_path_buf()).or_default());
}

pub fn movie_log(path: &Path) -> MovieLog {
    let movies = MOVIES.lock().unwrap_or_else(|e| e.into_inner());
    movies.get(path).cloned().unwrap_or_default()
}

struct FakeMovie {
    path: PathBuf,
    remaining: Option<usize>,
}

impl Movie for FakeMovie {
    fn step(&mut self) -> bool {
        with_log(&self.path, |log| log.steps += 1);
        match self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                self.remaining = Some(n - 1);
                true
            }
        }
    }

    fn set_game_name(&mut self, name: &str) {
        with_log(&self.path, |log| log.game = Some(name.to_string()));
    }

    fn load_keymap(&mut self, core: &str, buttons: &[String]) {
        with_log(&self.path, |log| {
            log.core = Some(core.to_string());
            log.keymap = buttons.to_vec();
        });
    }

    fn set_key(&mut self, key: u32, active: bool, player: u32) {
        with_log(&self.path, |log| log.keys.push((key, active, player)));
    }

    fn set_state(&mut self, state: &[u8]) {
        with_log(&self.path, |log| log.state = state.to_vec());
    }

    fn close(&mut self) {
        with_log(&self.path, |log| log.closes += 1);
    }
}
