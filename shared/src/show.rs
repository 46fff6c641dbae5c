use crate::{
    AudioSink, Canvas, Color, Command, Dice, Firework, FireworkConfig, Pattern, ScreenShake,
    Selection, ShowConfig, MAX_BURST,
};

const TRIAD_OFFSETS: [f64; 3] = [0.0, 30.0, 60.0];
const BURST_SHAKE: f64 = 1.5;
const FADE_ALPHA: f64 = 0.15;
const STAR_CHANCE: f64 = 0.03;
const CELEBRATION_DELAY_MS: f64 = 500.0;
const CELEBRATION_BANGS: usize = 10;
const CELEBRATION_BANG_GAP_MS: f64 = 200.0;

/// Admits frames at a fixed maximum rate.
#[derive(Debug, Clone)]
struct FrameClock {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    fn admit(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last_ms) if now_ms - last_ms < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Something the show has been asked to do later.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    /// One shell of a burst; its pattern is rolled when it fires.
    Launch,
    Celebration,
    Bang(f64, f64),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at_ms: f64,
    cue: Cue,
}

/// The simulation driver: owns every live [`Firework`] and advances and draws them frame by frame.
///
/// All timing is expressed in milliseconds on the clock handed to [`Show::tick`]; burst staggering, the
/// ambient launch timer, screen shake and deferred secondary bursts all resolve against it.
pub struct Show<A: AudioSink> {
    config: ShowConfig,
    audio: A,
    dice: Dice,
    fireworks: Vec<Firework>,
    next_id: u64,
    width: f64,
    height: f64,
    running: bool,
    selection: Selection,
    shake_enabled: bool,
    performance_mode: bool,
    muted: bool,
    shake: ScreenShake,
    clock: FrameClock,
    now_ms: f64,
    next_ambient_ms: Option<f64>,
    schedule: Vec<Scheduled>,
}

impl<A: AudioSink> Show<A> {
    pub fn new(config: ShowConfig, width: f64, height: f64, audio: A) -> Show<A> {
        let muted = !config.audio;
        audio.set_muted(muted);

        Show {
            dice: Dice::new(config.seed.unwrap_or_default()),
            fireworks: Vec::new(),
            next_id: 0,
            width,
            height,
            running: true,
            selection: config.selection,
            shake_enabled: config.screen_shake,
            performance_mode: config.performance_mode,
            muted,
            shake: ScreenShake::default(),
            clock: FrameClock {
                interval_ms: config.frame_interval_ms(),
                last_ms: None,
            },
            now_ms: 0.0,
            next_ambient_ms: None,
            schedule: Vec::new(),
            audio,
            config,
        }
    }

    /// Runs one animation frame at `now_ms`.
    ///
    /// Returns `Ok(false)` without touching anything when the frame comes too soon after the last admitted one.
    /// A draw error is only returned once every firework has been updated and the transform reset.
    pub fn tick<C: Canvas>(&mut self, now_ms: f64, canvas: &mut C) -> Result<bool, C::Error> {
        if !self.clock.admit(now_ms) {
            return Ok(false);
        }

        self.advance(now_ms);

        let backdrop = self.draw_backdrop(canvas);

        let offset = self
            .shake
            .is_shaking()
            .then(|| self.shake.offset(&mut self.dice));
        let translated = match offset {
            Some((dx, dy)) => canvas.translate(dx, dy),
            None => Ok(()),
        };

        self.fireworks.retain(|firework| !firework.is_dead());

        for firework in self.fireworks.iter_mut() {
            firework.update(now_ms, &mut self.dice, &self.audio);
        }

        let drawn = backdrop
            .and(translated)
            .and_then(|_| self.draw_fireworks(canvas));

        if offset.is_some() {
            canvas.reset_transform()?;
        }

        drawn.map(|_| true)
    }

    /// Fires due cues, rolls the ambient launch timer and settles the shake.
    fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        if !self.schedule.is_empty() {
            let (mut due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.schedule)
                .into_iter()
                .partition(|scheduled| scheduled.at_ms <= now_ms);
            self.schedule = later;
            due.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

            for scheduled in due {
                self.play(scheduled.cue);
            }
        }

        let interval_ms = self.config.auto_launch_interval_ms;

        match self.next_ambient_ms {
            None => self.next_ambient_ms = Some(now_ms + interval_ms),
            Some(next_ms) if next_ms <= now_ms => {
                if self.running && self.dice.chance(self.config.auto_launch_chance) {
                    self.launch(None);
                }

                let following = next_ms + interval_ms;
                self.next_ambient_ms = Some(if following <= now_ms {
                    now_ms + interval_ms
                } else {
                    following
                });
            }
            Some(_) => (),
        }

        self.shake.settle(now_ms);
    }

    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Launch => {
                let pattern = Pattern::random(&mut self.dice);
                self.launch(Some(pattern));
            }
            Cue::Celebration => self.audio.celebration(),
            Cue::Bang(pitch, volume) => self.audio.bang(pitch, volume),
        }
    }

    fn schedule(&mut self, at_ms: f64, cue: Cue) {
        self.schedule.push(Scheduled { at_ms, cue });
    }

    fn draw_backdrop<C: Canvas>(&mut self, canvas: &mut C) -> Result<(), C::Error> {
        if self.performance_mode {
            return canvas.fill_rect(0.0, 0.0, self.width, self.height, &Color::BLACK);
        }

        canvas.fill_rect(
            0.0,
            0.0,
            self.width,
            self.height,
            &Color::BLACK.with_alpha(FADE_ALPHA),
        )?;

        if self.dice.chance(STAR_CHANCE) {
            let star = (
                self.dice.range(0.0, self.width),
                self.dice.range(0.0, self.height * 0.4),
            );
            let radius = self.dice.range(0.3, 1.5);

            canvas.fill_circle(star, radius, &Color::WHITE.with_alpha(0.9))?;
        }

        Ok(())
    }

    fn draw_fireworks<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        for firework in self.fireworks.iter() {
            firework.draw(canvas)?;
        }

        Ok(())
    }

    fn spawn(&mut self, config: FireworkConfig) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let firework = Firework::new(id, config, &mut self.dice);

        log::debug!(
            "launched firework {} ({}, size {}) at x {:.0} towards y {:.0}",
            id,
            firework.pattern,
            firework.size,
            firework.x,
            firework.target_y
        );

        self.fireworks.push(firework);

        id
    }

    /// Launches a shell from a random point of the bottom edge, returning its id.
    ///
    /// Without an explicit `pattern` the current [`Selection`] decides.
    pub fn launch(&mut self, pattern: Option<Pattern>) -> u64 {
        let x = self.dice.range(0.0, self.width);
        let target_y = self.dice.range(0.0, self.height * 0.5);
        let hue = self.dice.range(0.0, 360.0).floor() + *self.dice.pick(&TRIAD_OFFSETS);
        let selection = self.selection;
        let pattern = pattern.unwrap_or_else(|| selection.resolve(&mut self.dice));
        let size = pattern.launch_size();

        let id = self.spawn(FireworkConfig {
            x,
            start_y: self.height,
            target_y,
            color: Some(Color::hsl(hue, 100.0, 70.0)),
            pattern: Some(pattern),
            size: Some(size),
        });

        if size > 1.0 {
            self.kick_shake(size * 0.3);
        }

        id
    }

    /// Launches a shell towards a pointer position.
    pub fn launch_at(&mut self, x: f64, y: f64) -> u64 {
        let hue = self.dice.range(0.0, 360.0).floor();

        self.spawn(FireworkConfig {
            x,
            start_y: self.height,
            target_y: y,
            color: Some(Color::hsl(hue, 100.0, 70.0)),
            pattern: self.selection.pattern(),
            size: Some(1.0),
        })
    }

    /// Schedules `count` launches of random patterns, staggered from now. At most [`MAX_BURST`] are scheduled.
    pub fn launch_burst(&mut self, count: usize) {
        let count = count.min(MAX_BURST);
        let stagger_ms = self.config.burst_stagger_ms;

        for i in 0..count {
            self.schedule(self.now_ms + i as f64 * stagger_ms, Cue::Launch);
        }

        self.kick_shake(BURST_SHAKE);

        log::info!("burst of {count} scheduled");
    }

    /// Fanfare followed by a volley of bangs and a full burst.
    pub fn celebrate(&mut self) {
        let start_ms = self.now_ms + CELEBRATION_DELAY_MS;

        self.schedule(start_ms, Cue::Celebration);
        for i in 0..CELEBRATION_BANGS {
            self.schedule(
                start_ms + i as f64 * CELEBRATION_BANG_GAP_MS,
                Cue::Bang(0.8, 0.4),
            );
        }

        self.launch_burst(self.config.burst_size);

        log::info!("celebration scheduled");
    }

    fn kick_shake(&mut self, intensity: f64) {
        if self.shake_enabled {
            self.shake.kick(intensity, self.now_ms);
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Select(selection) => self.set_selection(selection),
            Command::Launch => {
                self.launch(None);
            }
            Command::Burst(count) => self.launch_burst(count),
            Command::TogglePause => self.toggle_running(),
            Command::ToggleShake => self.toggle_shake(),
            Command::TogglePerformance => self.toggle_performance(),
            Command::ToggleAudio => self.toggle_audio(),
            Command::Celebrate => self.celebrate(),
        }
    }

    pub fn set_selection(&mut self, selection: Selection) {
        log::info!("selected {selection}");
        self.selection = selection;
    }

    /// Pausing only stops ambient launches; shells in flight and their pending bursts play out.
    pub fn set_running(&mut self, running: bool) {
        if running && !self.running {
            self.next_ambient_ms = Some(self.now_ms + self.config.auto_launch_interval_ms);
        }

        self.running = running;

        log::info!("{}", if running { "resumed" } else { "paused" });
    }

    pub fn toggle_running(&mut self) {
        self.set_running(!self.running);
    }

    pub fn toggle_shake(&mut self) {
        self.shake_enabled = !self.shake_enabled;

        if !self.shake_enabled {
            self.shake.stop();
        }
    }

    pub fn toggle_performance(&mut self) {
        self.performance_mode = !self.performance_mode;
    }

    pub fn toggle_audio(&mut self) {
        self.muted = !self.muted;
        self.audio.set_muted(self.muted);
    }

    /// Adopts a new viewport size. Live shells keep their positions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn shake(&self) -> &ScreenShake {
        &self.shake
    }

    pub fn shake_enabled(&self) -> bool {
        self.shake_enabled
    }

    pub fn performance_mode(&self) -> bool {
        self.performance_mode
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Number of cues still waiting to fire.
    pub fn scheduled(&self) -> usize {
        self.schedule.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, Sketch, Sound, Tape};
    use crate::LineCap;

    const FRAME: f64 = 17.0;

    fn show() -> Show<Tape> {
        let config = ShowConfig {
            seed: Some(17),
            ..Default::default()
        };

        Show::new(config, 1280.0, 720.0, Tape::default())
    }

    /// Ticks from `from_ms` through `until_ms` one frame apart, returning the next frame time.
    fn run(show: &mut Show<Tape>, sketch: &mut Sketch, from_ms: f64, until_ms: f64) -> f64 {
        let mut now = from_ms;

        while now <= until_ms {
            show.tick(now, sketch).unwrap();
            now += FRAME;
        }

        now
    }

    #[test]
    fn frames_are_throttled() {
        let mut show = show();
        let mut sketch = Sketch::default();

        assert!(show.tick(0.0, &mut sketch).unwrap());
        assert!(!show.tick(10.0, &mut sketch).unwrap());
        assert!(show.tick(FRAME, &mut sketch).unwrap());
        assert!(!show.tick(FRAME + 16.0, &mut sketch).unwrap());
        assert!(show.tick(FRAME + 16.7, &mut sketch).unwrap());
    }

    #[test]
    fn rejected_frame_has_no_side_effects() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.tick(0.0, &mut sketch).unwrap();
        show.launch(Some(Pattern::Peony));
        let y = show.fireworks()[0].y;
        let calls = sketch.calls.len();

        show.tick(5.0, &mut sketch).unwrap();

        assert_eq!(show.fireworks()[0].y, y);
        assert_eq!(sketch.calls.len(), calls);
    }

    #[test]
    fn launch_picks_geometry_and_size() {
        let mut show = show();
        show.set_running(false);

        for pattern in Pattern::ALL {
            show.launch(Some(pattern));
        }

        for firework in show.fireworks() {
            assert!((0.0..1280.0).contains(&firework.x));
            assert_eq!(firework.start_y, 720.0);
            assert!((0.0..360.0).contains(&firework.target_y));
            assert_eq!(firework.size, firework.pattern.launch_size());
        }

        assert_eq!(show.fireworks().len(), 6);
    }

    #[test]
    fn selection_drives_unspecified_launches() {
        let mut show = show();
        show.apply(Command::Select(Selection::Pattern(Pattern::Crackle)));

        show.launch(None);
        show.launch_at(200.0, 150.0);

        assert!(show
            .fireworks()
            .iter()
            .all(|firework| firework.pattern == Pattern::Crackle));

        let clicked = &show.fireworks()[1];
        assert_eq!((clicked.x, clicked.target_y, clicked.size), (200.0, 150.0, 1.0));
    }

    #[test]
    fn large_shells_shake_the_screen() {
        let mut show = show();

        show.launch(Some(Pattern::Palm));
        assert!(!show.shake().is_shaking());

        show.launch(Some(Pattern::Peony));
        assert!((show.shake().intensity() - 0.36).abs() < 1e-12);

        show.toggle_shake();
        assert!(!show.shake_enabled());
        assert!(!show.shake().is_shaking());
        show.launch(Some(Pattern::Ring));
        assert!(!show.shake().is_shaking());
    }

    #[test]
    fn shake_translates_and_resets() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.tick(0.0, &mut sketch).unwrap();
        show.launch_burst(0);
        sketch.calls.clear();

        show.tick(FRAME, &mut sketch).unwrap();
        assert_eq!(sketch.count(|c| matches!(c, Call::Translate(..))), 1);
        assert_eq!(sketch.calls.last(), Some(&Call::ResetTransform));

        sketch.calls.clear();
        run(&mut show, &mut sketch, 2.0 * FRAME, 250.0);
        sketch.calls.clear();
        show.tick(300.0, &mut sketch).unwrap();
        assert_eq!(sketch.count(|c| matches!(c, Call::Translate(..))), 0);
    }

    #[test]
    fn burst_launches_exactly_n_staggered() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.tick(0.0, &mut sketch).unwrap();
        show.set_running(false);
        show.launch_burst(20);
        assert_eq!(show.scheduled(), 20);
        assert!(show.fireworks().is_empty());

        show.tick(FRAME, &mut sketch).unwrap();
        assert_eq!(show.fireworks().len(), 1);

        run(&mut show, &mut sketch, 2.0 * FRAME, 19.0 * 50.0 + 2.0 * FRAME);

        assert_eq!(show.scheduled(), 0);
        let ids: Vec<u64> = show.fireworks().iter().map(|f| f.id).collect();
        assert_eq!(ids, (0..20).collect::<Vec<u64>>());
        assert!(show
            .fireworks()
            .iter()
            .all(|firework| Pattern::ALL.contains(&firework.pattern)));
    }

    #[test]
    fn oversized_burst_is_capped() {
        let mut show = show();

        show.apply(Command::Burst(1_000_000_000));

        assert_eq!(show.scheduled(), MAX_BURST);
    }

    #[test]
    fn paused_show_stops_ambient_launches_only() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.tick(0.0, &mut sketch).unwrap();
        show.apply(Command::TogglePause);
        assert!(!show.is_running());

        run(&mut show, &mut sketch, FRAME, 20_000.0);
        assert!(show.fireworks().is_empty());

        show.launch_burst(3);
        run(&mut show, &mut sketch, 20_000.0 + FRAME, 20_200.0);
        assert_eq!(show.fireworks().len(), 3);
    }

    #[test]
    fn running_show_launches_ambiently() {
        let mut show = show();
        let mut sketch = Sketch::default();
        let mut launched = 0;
        let mut now = 0.0;

        while now < 60_000.0 {
            show.tick(now, &mut sketch).unwrap();
            launched = launched.max(show.fireworks().iter().map(|f| f.id + 1).max().unwrap_or(0));
            now += FRAME;
        }

        // 75 timer ticks at 30% each.
        assert!((8..=45).contains(&launched), "launched {launched}");
    }

    #[test]
    fn dead_fireworks_are_culled_and_not_drawn() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.set_running(false);
        show.tick(0.0, &mut sketch).unwrap();
        show.launch_at(640.0, 700.0);

        let mut now = FRAME;
        while !show.fireworks().iter().all(|f| f.is_dead()) {
            show.tick(now, &mut sketch).unwrap();
            now += FRAME;
            assert!(now < 10_000.0);
        }

        sketch.calls.clear();
        show.tick(now, &mut sketch).unwrap();

        assert!(show.fireworks().is_empty());
        assert!(sketch
            .calls
            .iter()
            .all(|c| matches!(c, Call::Rect { .. }) || matches!(c, Call::Circle { radius, .. } if *radius < 1.5)));
    }

    #[test]
    fn crackle_stays_alive_until_injections_drain() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.set_running(false);
        show.apply(Command::Select(Selection::Pattern(Pattern::Crackle)));
        show.tick(0.0, &mut sketch).unwrap();
        show.launch_at(640.0, 720.0);

        show.tick(FRAME, &mut sketch).unwrap();
        let firework = &show.fireworks()[0];
        assert!(firework.exploded());
        assert!(firework.particles().is_empty());
        assert_eq!(firework.pending().len(), 8);

        let mut now = 2.0 * FRAME;
        while now < 340.0 {
            show.tick(now, &mut sketch).unwrap();
            assert_eq!(show.fireworks().len(), 1);
            now += FRAME;
        }

        assert!(show.fireworks()[0].pending().is_empty());
        assert_eq!(show.audio().count(|s| *s == Sound::Sparkle), 8);
    }

    #[test]
    fn palm_streaks_stop_when_their_life_runs_out() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.set_running(false);
        show.apply(Command::Select(Selection::Pattern(Pattern::Palm)));
        show.tick(0.0, &mut sketch).unwrap();
        show.launch_at(640.0, 720.0);

        let mut now = FRAME;
        let mut frames = 0;
        while !show.fireworks().is_empty() {
            sketch.calls.clear();
            show.tick(now, &mut sketch).unwrap();

            let live = show
                .fireworks()
                .iter()
                .flat_map(|firework| firework.particles())
                .filter(|particle| !particle.is_dead())
                .count();
            let streaks = sketch.count(|c| {
                matches!(
                    c,
                    Call::Polyline {
                        cap: LineCap::Round,
                        ..
                    }
                )
            });

            assert_eq!(streaks, live, "frame {frames}");

            now += FRAME;
            frames += 1;
            assert!(frames < 500);
        }

        // The palm outlives its streaks by one culling frame.
        assert!(frames > crate::PARTICLE_LIFE as usize);
    }

    #[test]
    fn performance_mode_clears_fully() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.tick(0.0, &mut sketch).unwrap();
        assert!(matches!(sketch.calls[0], Call::Rect { color, .. } if color.alpha == 0.15));

        show.apply(Command::TogglePerformance);
        sketch.calls.clear();
        show.tick(FRAME, &mut sketch).unwrap();
        assert!(matches!(sketch.calls[0], Call::Rect { color, .. } if color.alpha == 1.0));
    }

    #[test]
    fn celebration_plays_fanfare_and_volley() {
        let mut show = show();
        let mut sketch = Sketch::default();

        show.set_running(false);
        show.tick(0.0, &mut sketch).unwrap();
        show.celebrate();

        run(&mut show, &mut sketch, FRAME, 2500.0);

        let tape = show.audio();
        assert_eq!(tape.count(|s| *s == Sound::Celebration), 1);
        assert_eq!(tape.count(|s| *s == Sound::Bang(0.8, 0.4)), 10);
        assert_eq!(show.scheduled(), 0);
    }

    #[test]
    fn audio_toggle_reaches_sink() {
        let config = ShowConfig {
            audio: false,
            ..Default::default()
        };
        let mut show = Show::new(config, 800.0, 600.0, Tape::default());
        assert!(show.muted());

        show.apply(Command::ToggleAudio);

        assert!(!show.muted());
        assert_eq!(
            *show.audio().sounds.borrow(),
            vec![Sound::Muted(true), Sound::Muted(false)]
        );
    }

    #[test]
    fn resize_keeps_state() {
        let mut show = show();
        show.launch(Some(Pattern::Willow));
        let x = show.fireworks()[0].x;

        show.resize(400.0, 300.0);

        assert_eq!(show.viewport(), (400.0, 300.0));
        assert_eq!(show.fireworks()[0].x, x);
    }
}
