//! Payloads for custom apps (`/api/custom`) and notifications (`/api/notify`).
//!
//! Both share the same set of display fields, kept in [`Content`]. The
//! models are only obtainable through their builders, whose `build()`
//! checks every invariant, so a `CustomApplication` or `Notification`
//! value is always valid. Unset fields are left out of the JSON body.

use reqwest::Url;
use serde::{Serialize, Serializer};

use crate::color::Color;
use crate::draw::DrawInstruction;
use crate::error::ValidationError;
use crate::vocabulary::{EffectType, LifetimeMode, Palette, PushIcon, TextCase};

/// Maximum number of bar/line values, and the limit once an icon takes space.
pub const MAX_CHART_VALUES: usize = 16;
pub const MAX_CHART_VALUES_WITH_ICON: usize = 11;

/// Schemes a notification may be forwarded to.
pub const CLIENT_SCHEMES: [&str; 4] = ["http", "https", "mqtt", "mqtts"];

/// A colored piece of text. Fragments render left to right.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fragment {
    #[serde(rename = "t")]
    pub text: String,
    #[serde(rename = "c")]
    pub color: Color,
}

impl Fragment {
    pub fn new(text: impl Into<String>, color: Color) -> Fragment {
        return Fragment {
            text: text.into(),
            color,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Fragments(Vec<Fragment>),
}

impl From<&str> for Text {
    fn from(text: &str) -> Text {
        return Text::Plain(text.to_string());
    }
}

impl From<String> for Text {
    fn from(text: String) -> Text {
        return Text::Plain(text);
    }
}

impl From<Vec<Fragment>> for Text {
    fn from(fragments: Vec<Fragment>) -> Text {
        return Text::Fragments(fragments);
    }
}

/// Speed, palette and blending of a background effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EffectSettings {
    /// Usually 3. Higher is faster.
    pub speed: u32,
    pub palette: Palette,
    /// Interpolate between palette colors.
    pub blend: bool,
}

impl EffectSettings {
    pub fn new(speed: u32, palette: Palette, blend: bool) -> EffectSettings {
        return EffectSettings {
            speed,
            palette,
            blend,
        };
    }
}

/// Display fields shared by custom apps and notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<TextCase>,
    /// Draw the text on top of everything else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_text: Option<bool>,
    /// X offset of the first character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_offset: Option<u32>,
    /// Center short, non scrolling text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<bool>,
    /// Color of the text, bar or line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[Color; 2]>,
    /// Blink interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_text: Option<u32>,
    /// Fade interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_text: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainbow: Option<bool>,
    /// Icon id, icon file name without extension, or a base64 8x8 jpg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_icon: Option<PushIcon>,
    /// Scroll passes before the app ends, -1 for endless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<i32>,
    /// Seconds on screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<bool>,
    /// Progress bar percentage, -1 hides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(rename = "progressC", skip_serializing_if = "Option::is_none")]
    pub progress_color: Option<Color>,
    #[serde(rename = "progressBC", skip_serializing_if = "Option::is_none")]
    pub progress_background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw: Option<Vec<DrawInstruction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_scroll: Option<bool>,
    /// Percentage of the default scroll speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_settings: Option<EffectSettings>,
}

impl Content {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        let colorful = self.gradient.is_some() || self.rainbow == Some(true);
        if self.blink_text.is_some() && colorful {
            return Err(ValidationError::BlinkWithGradientOrRainbow);
        }
        if self.fade_text.is_some() && colorful {
            return Err(ValidationError::FadeWithGradientOrRainbow);
        }
        let max_values = if self.icon.is_some() {
            MAX_CHART_VALUES_WITH_ICON
        } else {
            MAX_CHART_VALUES
        };
        ValidationError::check_len("bar", &self.bar, max_values)?;
        ValidationError::check_len("line", &self.line, max_values)?;
        ValidationError::check_range("repeat", self.repeat.map(i64::from), -1, i64::MAX)?;
        ValidationError::check_range("duration", self.duration.map(i64::from), 1, i64::MAX)?;
        ValidationError::check_range("progress", self.progress.map(i64::from), -1, 100)?;
        ValidationError::check_range("scrollSpeed", self.scroll_speed.map(i64::from), 0, 100)?;
        return Ok(());
    }
}

macro_rules! content_setters {
    ($($(#[$meta:meta])* $field:ident: $arg:ty,)*) => {
        $(
            $(#[$meta])*
            fn $field(mut self, value: $arg) -> Self {
                self.content_mut().$field = Some(value.into());
                self
            }
        )*
    };
}

/// Setters for the [`Content`] fields, shared by both builders.
pub trait ContentBuilder: Sized {
    fn content_mut(&mut self) -> &mut Content;

    content_setters! {
        text: impl Into<Text>,
        text_case: TextCase,
        top_text: bool,
        text_offset: u32,
        center: bool,
        color: Color,
        blink_text: u32,
        fade_text: u32,
        background: Color,
        rainbow: bool,
        icon: impl Into<String>,
        push_icon: PushIcon,
        repeat: i32,
        duration: u32,
        bar: Vec<i32>,
        line: Vec<i32>,
        autoscale: bool,
        progress: i32,
        progress_color: Color,
        progress_background: Color,
        draw: Vec<DrawInstruction>,
        no_scroll: bool,
        scroll_speed: u8,
        effect: EffectType,
        effect_settings: EffectSettings,
    }

    /// Two color gradient over the text.
    fn gradient(mut self, from: Color, to: Color) -> Self {
        self.content_mut().gradient = Some([from, to]);
        self
    }
}

/// A persistent app placed in the device's loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomApplication {
    #[serde(flatten)]
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pos: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lifetime: Option<u32>,
    #[serde(rename = "lifetimeMode", skip_serializing_if = "Option::is_none")]
    lifetime_mode: Option<LifetimeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save: Option<bool>,
}

impl CustomApplication {
    pub fn builder() -> CustomApplicationBuilder {
        return CustomApplicationBuilder::default();
    }

    pub fn content(&self) -> &Content {
        return &self.content;
    }

    /// Position in the loop, 0 being first. Only honored on the first push.
    pub fn pos(&self) -> Option<u32> {
        return self.pos;
    }

    /// Seconds without an update before `lifetime_mode` applies.
    pub fn lifetime(&self) -> Option<u32> {
        return self.lifetime;
    }

    pub fn lifetime_mode(&self) -> Option<LifetimeMode> {
        return self.lifetime_mode;
    }

    /// Whether the app is written to flash and restored after boot.
    pub fn save(&self) -> Option<bool> {
        return self.save;
    }
}

#[derive(Clone, Debug, Default)]
pub struct CustomApplicationBuilder {
    content: Content,
    pos: Option<u32>,
    lifetime: Option<u32>,
    lifetime_mode: Option<LifetimeMode>,
    save: Option<bool>,
}

impl ContentBuilder for CustomApplicationBuilder {
    fn content_mut(&mut self) -> &mut Content {
        return &mut self.content;
    }
}

impl CustomApplicationBuilder {
    pub fn pos(mut self, pos: u32) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn lifetime(mut self, seconds: u32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn lifetime_mode(mut self, mode: LifetimeMode) -> Self {
        self.lifetime_mode = Some(mode);
        self
    }

    /// Avoid for apps updated often: flash has limited write cycles.
    pub fn save(mut self, save: bool) -> Self {
        self.save = Some(save);
        self
    }

    pub fn build(self) -> Result<CustomApplication, ValidationError> {
        self.content.validate()?;
        return Ok(CustomApplication {
            content: self.content,
            pos: self.pos,
            lifetime: self.lifetime,
            lifetime_mode: self.lifetime_mode,
            save: self.save,
        });
    }
}

/// A one-shot message shown on top of the loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    #[serde(flatten)]
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    hold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rtttl: Option<String>,
    #[serde(rename = "loopSound", skip_serializing_if = "Option::is_none")]
    loop_sound: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wakeup: Option<bool>,
    #[serde(serialize_with = "serialize_urls", skip_serializing_if = "Option::is_none")]
    clients: Option<Vec<Url>>,
}

fn serialize_urls<S: Serializer>(urls: &Option<Vec<Url>>, serializer: S) -> Result<S::Ok, S::Error> {
    match urls {
        Some(urls) => serializer.collect_seq(urls.iter().map(Url::as_str)),
        None => serializer.serialize_none(),
    }
}

impl Notification {
    pub fn builder() -> NotificationBuilder {
        return NotificationBuilder::default();
    }

    pub fn content(&self) -> &Content {
        return &self.content;
    }

    /// Stay on screen until dismissed.
    pub fn hold(&self) -> Option<bool> {
        return self.hold;
    }

    pub fn sound(&self) -> Option<&str> {
        return self.sound.as_deref();
    }

    pub fn rtttl(&self) -> Option<&str> {
        return self.rtttl.as_deref();
    }

    pub fn loop_sound(&self) -> Option<bool> {
        return self.loop_sound;
    }

    pub fn stack(&self) -> Option<bool> {
        return self.stack;
    }

    pub fn wakeup(&self) -> Option<bool> {
        return self.wakeup;
    }

    pub fn clients(&self) -> Option<&[Url]> {
        return self.clients.as_deref();
    }
}

#[derive(Clone, Debug, Default)]
pub struct NotificationBuilder {
    content: Content,
    hold: Option<bool>,
    sound: Option<String>,
    rtttl: Option<String>,
    loop_sound: Option<bool>,
    stack: Option<bool>,
    wakeup: Option<bool>,
    clients: Option<Vec<String>>,
}

impl ContentBuilder for NotificationBuilder {
    fn content_mut(&mut self) -> &mut Content {
        return &mut self.content;
    }
}

impl NotificationBuilder {
    pub fn hold(mut self, hold: bool) -> Self {
        self.hold = Some(hold);
        self
    }

    /// Melody file in the device's MELODIES folder, without extension.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn rtttl(mut self, rtttl: impl Into<String>) -> Self {
        self.rtttl = Some(rtttl.into());
        self
    }

    pub fn loop_sound(mut self, loop_sound: bool) -> Self {
        self.loop_sound = Some(loop_sound);
        self
    }

    /// `false` replaces the current notification immediately.
    pub fn stack(mut self, stack: bool) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn wakeup(mut self, wakeup: bool) -> Self {
        self.wakeup = Some(wakeup);
        self
    }

    /// Forward the notification to another device, e.g. `http://192.168.1.20`
    /// or `mqtt://awtrix_living`.
    pub fn client(mut self, url: impl Into<String>) -> Self {
        self.clients.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    pub fn build(self) -> Result<Notification, ValidationError> {
        self.content.validate()?;
        if self.sound.is_some() && self.rtttl.is_some() {
            return Err(ValidationError::SoundWithRtttl);
        }
        let clients = match self.clients {
            Some(raw) => Some(raw.iter().map(|url| parse_client(url)).collect::<Result<Vec<_>, _>>()?),
            None => None,
        };
        return Ok(Notification {
            content: self.content,
            hold: self.hold,
            sound: self.sound,
            rtttl: self.rtttl,
            loop_sound: self.loop_sound,
            stack: self.stack,
            wakeup: self.wakeup,
            clients,
        });
    }
}

fn parse_client(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidClient {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !CLIENT_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(format!("scheme {:?} is not one of {:?}", url.scheme(), CLIENT_SCHEMES)));
    }
    return Ok(url);
}
