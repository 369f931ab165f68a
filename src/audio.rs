//! Sound cues and background music
//!
//! The simulation only reports events; the frame driver turns them into cues
//! for an [`AudioSink`]. Natively cues are handed to a worker thread through a
//! bounded channel so the frame loop never waits on audio; the worker decodes
//! the sound files with `rodio`. In the browser the cues are synthesized with
//! Web Audio, which is asynchronous already.

use serde::{Deserialize, Serialize};

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Crash into traffic
    Explosion,
    /// Tyres on oil
    Skid,
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    Background,
}

/// Where the frame driver sends sound
pub trait AudioSink {
    /// Start a track looping forever at `volume` (0.0 - 1.0)
    fn play_looping(&mut self, track: Track, volume: f32);
    /// Fire a one-shot cue
    fn play_once(&mut self, cue: Cue);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_looping(&mut self, _track: Track, _volume: f32) {}
    fn play_once(&mut self, _cue: Cue) {}
}

/// Volume settings shared by every sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
        }
    }
}

impl Mixer {
    /// Effective cue volume
    pub fn sfx(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective volume for a track requested at `volume`
    pub fn music(&self, volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume * volume).clamp(0.0, 1.0)
        }
    }
}

/// A request handed to the audio worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioRequest {
    Once { cue: Cue, volume: f32 },
    Loop { track: Track, volume: f32 },
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{
    AudioDispatcher, AudioError, CuePlayer, LogPlayer, QUEUE_CAPACITY, SoundFiles, open_player,
};

#[cfg(all(not(target_arch = "wasm32"), feature = "audio-output"))]
pub use native::RodioPlayer;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;
    use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
    use std::thread::{self, JoinHandle};

    use thiserror::Error;

    use super::{AudioRequest, AudioSink, Cue, Mixer, Track};
    use crate::assets::AssetCatalog;

    /// Pending requests before new cues are dropped
    pub const QUEUE_CAPACITY: usize = 32;

    #[derive(Debug, Error)]
    pub enum AudioError {
        #[error("failed to open audio output: {0}")]
        Output(String),
        #[error("failed to open {path}: {source}")]
        Open {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error("failed to decode {path}: {reason}")]
        Decode { path: PathBuf, reason: String },
    }

    /// Runs on the audio worker and performs the actual playback
    pub trait CuePlayer {
        fn play(&mut self, request: AudioRequest);
    }

    impl<P: CuePlayer + ?Sized> CuePlayer for Box<P> {
        fn play(&mut self, request: AudioRequest) {
            (**self).play(request);
        }
    }

    /// Maps requests to sound files in the catalog
    #[derive(Debug, Clone)]
    pub struct SoundFiles {
        catalog: AssetCatalog,
    }

    impl SoundFiles {
        pub fn new(catalog: AssetCatalog) -> Self {
            Self { catalog }
        }

        /// File for `request`, under the asset root when one is configured
        pub fn path(&self, request: &AudioRequest) -> PathBuf {
            let asset = match request {
                AudioRequest::Once { cue, .. } => self.catalog.cue(*cue),
                AudioRequest::Loop { track, .. } => self.catalog.track(*track),
            };
            match &self.catalog.root {
                Some(root) => root.join(&asset.path),
                None => asset.path.clone(),
            }
        }

        /// Open the file for `request`
        pub fn open(
            &self,
            request: &AudioRequest,
        ) -> Result<(PathBuf, BufReader<File>), AudioError> {
            let path = self.path(request);
            match File::open(&path) {
                Ok(file) => Ok((path, BufReader::new(file))),
                Err(source) => Err(AudioError::Open { path, source }),
            }
        }
    }

    /// Reports each request with the file it refers to. Used when there is no
    /// asset tree or no output device.
    #[derive(Debug, Clone)]
    pub struct LogPlayer {
        files: SoundFiles,
    }

    impl LogPlayer {
        pub fn new(catalog: AssetCatalog) -> Self {
            Self {
                files: SoundFiles::new(catalog),
            }
        }
    }

    impl CuePlayer for LogPlayer {
        fn play(&mut self, request: AudioRequest) {
            let path = self.files.path(&request);
            match request {
                AudioRequest::Once { volume, .. } => {
                    log::debug!("Cue {} at volume {volume:.2}", path.display())
                }
                AudioRequest::Loop { volume, .. } => {
                    log::info!("Looping {} at volume {volume:.2}", path.display())
                }
            }
        }
    }

    #[cfg(feature = "audio-output")]
    pub use output::RodioPlayer;

    #[cfg(feature = "audio-output")]
    mod output {
        use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

        use super::{AudioError, AudioRequest, CuePlayer, SoundFiles};
        use crate::assets::AssetCatalog;

        /// Decodes catalog sound files and plays them on the default device.
        /// The output stream is not `Send`, so this is built on the worker.
        pub struct RodioPlayer {
            files: SoundFiles,
            stream: OutputStream,
            music: Option<Sink>,
        }

        impl RodioPlayer {
            pub fn open(catalog: AssetCatalog) -> Result<Self, AudioError> {
                let stream = OutputStreamBuilder::open_default_stream()
                    .map_err(|e| AudioError::Output(e.to_string()))?;
                Ok(Self {
                    files: SoundFiles::new(catalog),
                    stream,
                    music: None,
                })
            }

            fn sink(&self, request: &AudioRequest) -> Result<Sink, AudioError> {
                let (path, reader) = self.files.open(request)?;
                let source = Decoder::new(reader).map_err(|e| AudioError::Decode {
                    path,
                    reason: e.to_string(),
                })?;
                let sink = Sink::connect_new(self.stream.mixer());
                match request {
                    AudioRequest::Once { volume, .. } => {
                        sink.set_volume(*volume);
                        sink.append(source);
                    }
                    AudioRequest::Loop { volume, .. } => {
                        sink.set_volume(*volume);
                        sink.append(source.repeat_infinite());
                    }
                }
                Ok(sink)
            }
        }

        impl CuePlayer for RodioPlayer {
            fn play(&mut self, request: AudioRequest) {
                if let AudioRequest::Loop { volume, .. } = request {
                    if let Some(music) = self.music.take() {
                        music.stop();
                    }
                    if volume <= 0.0 {
                        return;
                    }
                }
                match self.sink(&request) {
                    Ok(sink) => match request {
                        AudioRequest::Once { .. } => sink.detach(),
                        AudioRequest::Loop { .. } => self.music = Some(sink),
                    },
                    Err(err) => log::warn!("{err}"),
                }
            }
        }
    }

    /// Player for the worker thread: real output when an asset tree is
    /// configured and a device opens, logging otherwise
    pub fn open_player(catalog: AssetCatalog) -> Box<dyn CuePlayer> {
        if catalog.root.is_none() {
            log::info!("No asset directory, sound cues are only logged");
            return Box::new(LogPlayer::new(catalog));
        }

        #[cfg(feature = "audio-output")]
        match output::RodioPlayer::open(catalog.clone()) {
            Ok(player) => return Box::new(player),
            Err(err) => log::warn!("{err}, sound cues are only logged"),
        }

        Box::new(LogPlayer::new(catalog))
    }

    /// Enqueue-only audio front. Cues go to a worker thread through a bounded
    /// channel; a full queue drops the cue instead of blocking the frame.
    pub struct AudioDispatcher {
        sender: Option<SyncSender<AudioRequest>>,
        worker: Option<JoinHandle<()>>,
        mixer: Mixer,
        dropped: usize,
    }

    impl AudioDispatcher {
        pub fn new(player: impl CuePlayer + Send + 'static, mixer: Mixer) -> Self {
            Self::spawn(move || player, mixer)
        }

        /// Start the worker; `make_player` runs on the worker thread
        pub fn spawn<P, F>(make_player: F, mixer: Mixer) -> Self
        where
            P: CuePlayer,
            F: FnOnce() -> P + Send + 'static,
        {
            Self::with_capacity(make_player, mixer, QUEUE_CAPACITY)
        }

        pub fn with_capacity<P, F>(make_player: F, mixer: Mixer, capacity: usize) -> Self
        where
            P: CuePlayer,
            F: FnOnce() -> P + Send + 'static,
        {
            let (sender, receiver): (SyncSender<AudioRequest>, Receiver<AudioRequest>) =
                sync_channel(capacity);

            let worker = thread::Builder::new()
                .name("audio".into())
                .spawn(move || {
                    let mut player = make_player();
                    for request in receiver {
                        player.play(request);
                    }
                    log::debug!("Audio worker finished");
                });

            let worker = match worker {
                Ok(handle) => Some(handle),
                Err(err) => {
                    log::warn!("Failed to start audio worker, audio disabled: {err}");
                    None
                }
            };

            Self {
                sender: worker.as_ref().map(|_| sender),
                worker,
                mixer,
                dropped: 0,
            }
        }

        /// Requests lost to a full queue or a dead worker
        pub fn dropped(&self) -> usize {
            self.dropped
        }

        fn enqueue(&mut self, request: AudioRequest) {
            let Some(sender) = &self.sender else {
                self.dropped += 1;
                return;
            };
            match sender.try_send(request) {
                Ok(()) => {}
                Err(TrySendError::Full(request)) => {
                    self.dropped += 1;
                    log::warn!("Audio queue full, dropping {request:?}");
                }
                Err(TrySendError::Disconnected(request)) => {
                    self.dropped += 1;
                    log::warn!("Audio worker gone, dropping {request:?}");
                    self.sender = None;
                }
            }
        }
    }

    impl AudioSink for AudioDispatcher {
        fn play_looping(&mut self, track: Track, volume: f32) {
            let volume = self.mixer.music(volume);
            self.enqueue(AudioRequest::Loop { track, volume });
        }

        fn play_once(&mut self, cue: Cue) {
            let volume = self.mixer.sfx();
            if volume <= 0.0 {
                return;
            }
            self.enqueue(AudioRequest::Once { cue, volume });
        }
    }

    impl Drop for AudioDispatcher {
        fn drop(&mut self) {
            // Closing the channel ends the worker loop once the queue drains
            self.sender.take();
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    log::warn!("Audio worker panicked");
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue, Mixer, Track};

    /// Synthesized cues through the Web Audio API, no sound files needed
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        mixer: Mixer,
        /// Nodes of the running music loop
        music: Vec<OscillatorNode>,
    }

    impl WebAudio {
        pub fn new(mixer: Mixer) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                mixer,
                music: Vec::new(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn context(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            // Browsers start suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Crash - low boom with a sharp crack on top
        fn play_explosion(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = Self::create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                    .ok();
                osc.frequency().set_value_at_time(110.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(25.0, t + 0.6)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.7).ok();
            }

            if let Some((osc, gain)) = Self::create_osc(ctx, 1800.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Oil - wobbling tyre squeal
        fn play_skid(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 900.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.45)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency().set_value_at_time(1100.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(850.0, t + 0.16).ok();
            osc.frequency().set_value_at_time(1050.0, t + 0.24).ok();
            osc.frequency().set_value_at_time(800.0, t + 0.32).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        /// Engine drone: two detuned low oscillators that never stop
        fn start_music(&mut self, vol: f32) {
            let Some(ctx) = self.context().cloned() else {
                return;
            };
            for (freq, osc_type) in [
                (55.0, OscillatorType::Triangle),
                (82.5, OscillatorType::Sine),
            ] {
                if let Some((osc, gain)) = Self::create_osc(&ctx, freq, osc_type) {
                    gain.gain().set_value(vol * 0.25);
                    osc.start().ok();
                    self.music.push(osc);
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play_looping(&mut self, track: Track, volume: f32) {
            let vol = self.mixer.music(volume);
            for osc in self.music.drain(..) {
                osc.stop().ok();
            }
            if vol <= 0.0 {
                return;
            }
            match track {
                Track::Background => self.start_music(vol),
            }
        }

        fn play_once(&mut self, cue: Cue) {
            let vol = self.mixer.sfx();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };
            match cue {
                Cue::Explosion => Self::play_explosion(ctx, vol),
                Cue::Skid => Self::play_skid(ctx, vol),
            }
        }
    }
}
