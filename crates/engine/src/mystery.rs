//! Mystery-box spin session
//!
//! The wheel only turns after the platform accepted a claim. Rejections
//! leave every piece of session state where it was.

use crate::dispatcher::{mystery_box_key, ActionDispatcher};
use gamelayer_core::{wheel_prizes, Error, MysteryBox, Prize, Result};
use gamelayer_networking::GameLayerApi;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Length of the wheel animation
pub const SPIN_DURATION: Duration = Duration::from_millis(3000);

/// Five full turns before the wheel starts settling on its segment
const MIN_SPIN_DEGREES: f64 = 1800.0;

/// How far from a segment's centre the pointer may land, in segment widths
const LANDING_JITTER: f64 = 0.4;

/// `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Index of the segment under the pointer for a wheel rotated by `angle` degrees
pub fn segment_at(angle: f64, segments: usize) -> usize {
    if segments == 0 {
        return 0;
    }
    let width = 360.0 / segments as f64;
    let normalized = angle.rem_euclid(360.0);
    let index = ((360.0 - normalized) / width).floor() as usize;
    // angle 0 maps to 360 / width == segments
    index % segments
}

/// A running wheel animation from `start` to `target` degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub start: f64,
    pub target: f64,
    pub duration: Duration,
}

impl SpinAnimation {
    /// Animation that ends with segment `index` of `segments` under the pointer.
    ///
    /// `jitter` shifts the landing point inside the segment and is clamped
    /// to stay clear of the borders.
    pub fn landing_on(start: f64, index: usize, segments: usize, jitter: f64) -> Self {
        let segments = segments.max(1);
        let width = 360.0 / segments as f64;
        let offset = index.min(segments - 1) as f64 + 0.5 + jitter.clamp(-LANDING_JITTER, LANDING_JITTER);
        let landing = 360.0 - offset * width;
        let base = (start / 360.0).ceil() * 360.0 + MIN_SPIN_DEGREES;

        Self {
            start,
            target: base + landing,
            duration: SPIN_DURATION,
        }
    }

    /// Same, with a random landing point inside the segment
    pub fn random_landing_on(start: f64, index: usize, segments: usize) -> Self {
        let jitter = rand::thread_rng().gen_range(-LANDING_JITTER..LANDING_JITTER);
        Self::landing_on(start, index, segments, jitter)
    }

    /// Fraction of the animation done after `elapsed`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn rotation_at(&self, elapsed: Duration) -> f64 {
        self.start + (self.target - self.start) * ease_out_cubic(self.progress(elapsed))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Segment the wheel stops on
    pub fn final_segment(&self, segments: usize) -> usize {
        segment_at(self.target, segments)
    }
}

/// One mystery box, its wheel and the prizes won this session
pub struct MysteryBoxSession<A> {
    api: Arc<A>,
    mystery_box: MysteryBox,
    prizes: Vec<Prize>,
    won: HashSet<String>,
    selected_prize: Option<Prize>,
    rotation: f64,
    spinning: Option<(SpinAnimation, Prize)>,
}

impl<A: GameLayerApi> MysteryBoxSession<A> {
    /// Fetch the box and its wheel prizes
    pub async fn load(api: Arc<A>, box_id: &str) -> Result<Self> {
        let (mystery_box, prizes) = fetch_wheel(api.as_ref(), box_id).await?;
        Ok(Self {
            api,
            mystery_box,
            prizes,
            won: HashSet::new(),
            selected_prize: None,
            rotation: 0.0,
            spinning: None,
        })
    }

    /// Re-fetch box and prizes after a claim; the won set is kept
    pub async fn refresh(&mut self) -> Result<()> {
        let (mystery_box, prizes) = fetch_wheel(self.api.as_ref(), &self.mystery_box.id).await?;
        self.mystery_box = mystery_box;
        self.prizes = prizes;
        Ok(())
    }

    pub fn mystery_box(&self) -> &MysteryBox {
        &self.mystery_box
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Wheel segments: prizes not yet won in this session
    pub fn offered_prizes(&self) -> Vec<&Prize> {
        self.prizes.iter().filter(|p| !self.won.contains(&p.id)).collect()
    }

    pub fn selected_prize(&self) -> Option<&Prize> {
        self.selected_prize.as_ref()
    }

    pub fn won_prizes(&self) -> &HashSet<String> {
        &self.won
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.is_some()
    }

    /// Claim the box through `dispatcher` and, if the platform awards a
    /// prize, start the wheel.
    ///
    /// # Errors
    /// `Busy` while a spin or claim is unfinished, `NotAvailable` for a
    /// closed box, `Rejected` with the server's message for refused claims.
    /// None of them touch the session state.
    pub async fn spin(&mut self, dispatcher: &ActionDispatcher<A>, player_id: &str) -> Result<SpinAnimation> {
        if self.spinning.is_some() {
            return Err(Error::Busy(mystery_box_key(&self.mystery_box.id)));
        }
        if !self.mystery_box.is_available {
            return Err(Error::NotAvailable("Mystery wheel is not available".to_string()));
        }

        let claim = dispatcher
            .claim_mystery_box(player_id, &self.mystery_box.id)
            .await?;

        let won = claim
            .prize
            .filter(|p| !p.id.is_empty())
            .ok_or_else(|| {
                warn!("Claim succeeded without a prize payload");
                Error::InvalidData("Claim response did not include a prize".to_string())
            })?
            .into_prize();

        let segments = self.offered_prizes();
        let animation = match segments.iter().position(|p| p.id == won.id) {
            Some(index) => SpinAnimation::random_landing_on(self.rotation, index, segments.len()),
            None => {
                debug!("Prize {} is not on the wheel, spinning to the first segment", won.id);
                SpinAnimation::random_landing_on(self.rotation, 0, segments.len())
            }
        };

        info!("Claimed {} from {}", won.name, self.mystery_box.id);
        self.spinning = Some((animation, won));
        Ok(animation)
    }

    /// End the running animation and reveal the prize
    pub fn finish_spin(&mut self) -> Option<&Prize> {
        let (animation, prize) = self.spinning.take()?;
        self.rotation = animation.target;
        self.won.insert(prize.id.clone());
        self.selected_prize = Some(prize);
        self.selected_prize.as_ref()
    }

    /// Hide the revealed prize and put the wheel back at rest
    pub fn reset(&mut self) {
        self.selected_prize = None;
        self.rotation = 0.0;
        self.spinning = None;
    }
}

async fn fetch_wheel<A: GameLayerApi>(api: &A, box_id: &str) -> Result<(MysteryBox, Vec<Prize>)> {
    let (mystery_box, prizes) = tokio::join!(api.get_mystery_box(box_id), api.list_prizes());
    let mystery_box = mystery_box?;
    let prizes = wheel_prizes(prizes?);
    debug!("Mystery box {} has {} wheel prizes", mystery_box.id, prizes.len());

    if prizes.is_empty() {
        return Err(Error::NotAvailable("No prizes available".to_string()));
    }
    Ok((mystery_box, prizes))
}
