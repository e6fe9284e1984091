//=========================================================================
// Audial Demo
//=========================================================================
//
// Scripted tour of the audio subsystem.
//
// Sequence (one step per wait):
//   stream: load → play → pause → resume → stop
//   buffer: load → play → pause → resume, stream again on a second channel
//   release both, reload buffer, play 40 times (channel overflow)
//   release, reload into the music slot, play with one loop, idle
//
// A label narrates each step. Any load or play failure is reported on
// the label and ends the script normally.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::DemoUnit;
use crate::core::script::{Coroutine, CoroutineState, ScheduledScript, ScriptResult, Yielder};
use crate::core::services::{
    Audio, AudioError, Channel, Drawable, DrawableId, Label, Services, Shared, Sound,
    TextAlignment, Vec2,
};

//=== Constants ===========================================================

const STREAM_PATH: &str = "bgm.ogg";
const SOUND_PATH: &str = "sfx.ogg";

const STEP_MS: u64 = 1000;
const RELEASE_MS: u64 = 1500;
const OVERFLOW_PLAYS: usize = 40;
const OVERFLOW_INTERVAL_MS: u64 = 100;
const IDLE_MS: u64 = 1000 * 60 * 10;

const FONT: &str = "OpenSans-Light.ttf";
const FONT_SIZE: u32 = 21;

//=== Shared Script State =================================================

/// Which of the two sound handles an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Music,
    Sound,
}

/// State reachable from both the demo and its script body.
struct AudialState {
    label: Shared<Label>,
    music: Option<Sound>,
    sound: Option<Sound>,
}

impl AudialState {
    fn slot(&mut self, slot: Slot) -> &mut Option<Sound> {
        match slot {
            Slot::Music => &mut self.music,
            Slot::Sound => &mut self.sound,
        }
    }
}

type ChannelOp = fn(&mut dyn Audio, Channel) -> Result<(), AudioError>;

/// Script-side view of the demo: narration plus audio calls that record
/// what they acquire in the shared state.
struct Narrator {
    services: Services,
    state: Rc<RefCell<AudialState>>,
}

impl Narrator {
    fn say(&self, text: impl Into<String>) {
        self.state.borrow().label.borrow_mut().set_text(text);
    }

    /// Loads `path` into `slot`. The slot must be empty.
    fn load(&self, slot: Slot, path: &str, streaming: bool) -> Result<(), AudioError> {
        let sound = if streaming {
            self.services.audio().load_stream(path)?
        } else {
            self.services.audio().load_sound(path)?
        };

        let mut state = self.state.borrow_mut();
        if let Some(previous) = state.slot(slot).replace(sound) {
            warn!(target: "demo", "Audial: {:?} slot was not empty, releasing old sound", slot);
            self.services.audio().release(previous);
        }
        Ok(())
    }

    fn play(&self, slot: Slot) -> Result<Channel, AudioError> {
        let mut state = self.state.borrow_mut();
        match state.slot(slot).as_ref() {
            Some(sound) => self.services.audio().play(sound),
            None => Err(AudioError::PlaybackFailed(format!("{:?} slot is empty", slot))),
        }
    }

    fn release(&self, slot: Slot) {
        let taken = self.state.borrow_mut().slot(slot).take();
        if let Some(sound) = taken {
            self.services.audio().release(sound);
        }
    }

    /// Channel control failures (e.g. a stolen voice) are not fatal.
    fn control(&self, channel: Channel, op: ChannelOp) {
        if let Err(err) = op(&mut *self.services.audio(), channel) {
            debug!(target: "demo", "Audial: {}", err);
        }
    }
}

//=== Script Body =========================================================

async fn tour(y: Yielder<()>, n: Narrator) -> ScriptResult {
    //--- Streaming --------------------------------------------------------

    n.say(format!("Loading '{}' for streaming...", STREAM_PATH));
    if n.load(Slot::Music, STREAM_PATH, true).is_err() {
        n.say(format!("Failed to load '{}'", STREAM_PATH));
        return Ok(());
    }
    y.wait(STEP_MS).await;

    n.say(format!("Streaming '{}'...", STREAM_PATH));
    let Ok(channel) = n.play(Slot::Music) else {
        n.say(format!("Failed to stream '{}'", STREAM_PATH));
        return Ok(());
    };
    y.wait(STEP_MS).await;

    n.say("Paused");
    n.control(channel, |a, c| a.pause(c));
    y.wait(STEP_MS).await;

    n.say("Resume streaming...");
    n.control(channel, |a, c| a.resume(c));
    y.wait(STEP_MS).await;

    n.say("Stop streaming");
    n.control(channel, |a, c| a.stop(c));
    y.wait(STEP_MS).await;

    //--- Buffered ---------------------------------------------------------

    n.say(format!("Loading '{}' into memory...", SOUND_PATH));
    if n.load(Slot::Sound, SOUND_PATH, false).is_err() {
        n.say(format!("Failed to load '{}'", SOUND_PATH));
        return Ok(());
    }
    y.wait(STEP_MS).await;

    n.say(format!("Playing '{}'...", SOUND_PATH));
    let Ok(channel) = n.play(Slot::Sound) else {
        n.say(format!("Failed to play '{}'", SOUND_PATH));
        return Ok(());
    };
    y.wait(STEP_MS).await;

    n.say("Paused");
    n.control(channel, |a, c| a.pause(c));
    y.wait(STEP_MS).await;

    n.say("Resume playing...");
    n.control(channel, |a, c| a.resume(c));
    y.wait(STEP_MS).await;

    n.say("Streaming (different channel)...");
    if n.play(Slot::Music).is_err() {
        n.say(format!("Failed to play '{}'", STREAM_PATH));
        return Ok(());
    }
    y.wait(STEP_MS).await;

    //--- Release and overflow ---------------------------------------------

    n.say("Delete both buffer and stream");
    n.release(Slot::Music);
    n.release(Slot::Sound);
    y.wait(RELEASE_MS).await;

    n.say("Load into buffer and play (overflow)");
    if n.load(Slot::Sound, SOUND_PATH, false).is_err() {
        n.say(format!("Failed to load '{}'", SOUND_PATH));
        return Ok(());
    }
    for _ in 0..OVERFLOW_PLAYS {
        if let Err(err) = n.play(Slot::Sound) {
            debug!(target: "demo", "Audial: {}", err);
        }
        y.wait(OVERFLOW_INTERVAL_MS).await;
    }
    y.wait(STEP_MS).await;

    n.say("Clear");
    n.release(Slot::Sound);
    y.wait(RELEASE_MS).await;

    //--- Looping ----------------------------------------------------------

    n.say("Loop once");
    if n.load(Slot::Music, SOUND_PATH, false).is_err() {
        n.say(format!("Failed to load '{}'", SOUND_PATH));
        return Ok(());
    }
    let Ok(channel) = n.play(Slot::Music) else {
        n.say(format!("Failed to play '{}'", SOUND_PATH));
        return Ok(());
    };
    n.control(channel, |a, c| a.set_loop_count(c, 1));
    y.wait(IDLE_MS).await;

    Ok(())
}

//=== Audial ==============================================================

/// Audio walkthrough narrated by a centred label.
pub struct Audial {
    services: Services,
    state: Rc<RefCell<AudialState>>,
    label_id: DrawableId,
    script: Option<ScheduledScript>,
}

impl Audial {
    pub fn new(services: &Services, width: f32, height: f32) -> Self {
        let label = Label::new()
            .with_alignment(TextAlignment::Center)
            .with_font(FONT)
            .with_font_size(FONT_SIZE)
            .with_position(Vec2::new(width * 0.5, height * 0.5))
            .into_shared();
        let label_id = label.borrow().id();
        services.render_queue().add(Drawable::from(&label));

        let state = Rc::new(RefCell::new(AudialState {
            label,
            music: None,
            sound: None,
        }));

        let narrator = Narrator {
            services: services.clone(),
            state: Rc::clone(&state),
        };
        let script = ScheduledScript::start(Coroutine::new(move |y, _| tour(y, narrator)));

        Self {
            services: services.clone(),
            state,
            label_id,
            script: Some(script),
        }
    }

    /// Current narration text.
    pub fn text(&self) -> String {
        self.state.borrow().label.borrow().text().to_owned()
    }
}

impl DemoUnit for Audial {
    fn update(&mut self, dt: f64) {
        if let Some(script) = self.script.as_mut() {
            script.update(dt);
        }
    }

    fn deinit(&mut self) {
        // The orphaned script is dropped without being resumed again.
        self.script = None;

        let (music, sound) = {
            let mut state = self.state.borrow_mut();
            (state.music.take(), state.sound.take())
        };
        let mut audio = self.services.audio();
        for held in [music, sound].into_iter().flatten() {
            audio.release(held);
        }
        drop(audio);

        self.services.render_queue().erase(self.label_id);
    }

    fn script_state(&self) -> Option<&CoroutineState> {
        self.script.as_ref().map(|s| s.state())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::testing::TestBackends;
    use crate::core::services::{HeadlessAudio, HeadlessTextures, RenderQueue};

    fn step(demo: &mut Audial, ms: u64) {
        demo.update(ms as f64);
    }

    #[test]
    fn init_loads_stream_and_registers_label() {
        let t = TestBackends::new();
        let demo = Audial::new(&t.services, 800.0, 600.0);

        assert_eq!(demo.text(), "Loading 'bgm.ogg' for streaming...");
        assert_eq!(t.audio.borrow().live_sounds(), 1);
        assert!(t.queue.borrow().contains(demo.label_id));
        assert_eq!(demo.script_state(), Some(&CoroutineState::Suspended));
    }

    #[test]
    fn narration_follows_the_waits() {
        let t = TestBackends::new();
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        step(&mut demo, 999);
        assert_eq!(demo.text(), "Loading 'bgm.ogg' for streaming...");
        step(&mut demo, 1);
        assert_eq!(demo.text(), "Streaming 'bgm.ogg'...");
        assert_eq!(t.audio.borrow().active_channels(), 1);

        step(&mut demo, 1000);
        assert_eq!(demo.text(), "Paused");
        step(&mut demo, 1000);
        assert_eq!(demo.text(), "Resume streaming...");
        step(&mut demo, 1000);
        assert_eq!(demo.text(), "Stop streaming");
        assert_eq!(t.audio.borrow().active_channels(), 0);
    }

    #[test]
    fn overflow_plays_stay_within_channel_limit() {
        let t = TestBackends::new();
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        // Drive through to the end of the overflow section.
        for _ in 0..200 {
            step(&mut demo, 1500);
            assert!(t.audio.borrow().active_channels() <= crate::core::services::MAX_CHANNELS);
        }
        assert_eq!(demo.text(), "Loop once");
        assert_eq!(t.audio.borrow().live_sounds(), 1);
        assert_eq!(demo.script_state(), Some(&CoroutineState::Suspended));
    }

    #[test]
    fn missing_stream_is_reported_and_script_ends() {
        let t = TestBackends::with(
            HeadlessAudio::new().with_missing(STREAM_PATH),
            HeadlessTextures::new(),
        );
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        assert_eq!(demo.text(), "Failed to load 'bgm.ogg'");
        assert_eq!(demo.script_state(), Some(&CoroutineState::Completed));

        demo.update(1.0e9);
        assert_eq!(demo.text(), "Failed to load 'bgm.ogg'");

        demo.deinit();
        assert_eq!(t.services.resource_count(), 0);
    }

    #[test]
    fn playback_failure_is_reported() {
        let t = TestBackends::with(
            HeadlessAudio::new().with_playback_disabled(),
            HeadlessTextures::new(),
        );
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        step(&mut demo, 1000);
        assert_eq!(demo.text(), "Failed to stream 'bgm.ogg'");
        assert_eq!(demo.script_state(), Some(&CoroutineState::Completed));

        demo.deinit();
        assert_eq!(t.services.resource_count(), 0);
    }

    #[test]
    fn second_channel_failure_is_reported_as_play() {
        let t = TestBackends::new();
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        step(&mut demo, 999);
        step(&mut demo, 1);
        for _ in 0..7 {
            step(&mut demo, 1000);
        }
        assert_eq!(demo.text(), "Resume playing...");

        t.audio.borrow_mut().set_playback_disabled(true);
        step(&mut demo, 1000);
        assert_eq!(demo.text(), "Failed to play 'bgm.ogg'");
        assert_eq!(demo.script_state(), Some(&CoroutineState::Completed));

        demo.deinit();
        assert_eq!(t.services.resource_count(), 0);
    }

    #[test]
    fn deinit_mid_script_releases_only_what_was_acquired() {
        let t = TestBackends::new();
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        // Stream and buffer are both loaded at this point.
        for _ in 0..6 {
            step(&mut demo, 1000);
        }
        assert_eq!(t.audio.borrow().live_sounds(), 2);

        demo.deinit();
        assert_eq!(t.audio.borrow().live_sounds(), 0);
        assert!(t.queue.borrow().is_empty());
        assert_eq!(demo.script_state(), None);
    }

    #[test]
    fn second_deinit_is_a_no_op() {
        let t = TestBackends::new();
        let mut demo = Audial::new(&t.services, 800.0, 600.0);

        demo.deinit();
        demo.deinit();
        assert_eq!(t.services.resource_count(), 0);
    }
}
