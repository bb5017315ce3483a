//! Frame pacing for the runner.

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    frame_interval_ms: u64,
    idle_interval_ms: u64,
    last_render_ms: u64,
    last_fingerprint: u64,
    has_rendered: bool,
}

impl RenderThrottle {
    pub fn new(frame_interval_ms: u64, idle_interval_ms: u64) -> Self {
        Self {
            frame_interval_ms,
            idle_interval_ms,
            last_render_ms: 0,
            last_fingerprint: 0,
            has_rendered: false,
        }
    }

    /// Decide whether to render a new frame.
    ///
    /// - A changed fingerprint renders at most once per `frame_interval_ms`.
    /// - An unchanged one re-renders once per `idle_interval_ms`, which repairs
    ///   the terminal after stray output.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_render_ms);
        let due = if !self.has_rendered {
            true
        } else if fingerprint != self.last_fingerprint {
            elapsed >= self.frame_interval_ms
        } else {
            elapsed >= self.idle_interval_ms
        };

        if due {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            self.last_fingerprint = fingerprint;
        }
        due
    }

    /// Forget the last frame so the next call renders.
    pub fn invalidate(&mut self) {
        self.has_rendered = false;
    }
}
