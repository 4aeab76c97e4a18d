// High-level overview:
//
// Protocol:                     HTTP/JSON (/api/...)
// Library Concept:      device <--------------------> client <------------> models <-------------> user
//
// Implementing Module:                          client.rs, config.rs    application, settings,
//                                                                        response, draw, ...
//
// Everything below `client` is plain data: building a request model validates
// it, decoding a response checks its shape. Only the client touches the network.

pub mod application;
pub mod args;
pub mod client;
pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod indicator;
pub mod moodlight;
pub mod response;
pub mod settings;
pub mod vocabulary;

pub use application::{
    Content, ContentBuilder, CustomApplication, EffectSettings, Fragment, Notification, Text,
};
pub use client::AwtrixClient;
pub use color::{Color, ColorError, HexForm};
pub use config::{ClientConfig, ConfigError, TlsVerify};
pub use draw::DrawInstruction;
pub use error::{DecodeError, Error, ValidationError};
pub use indicator::{Indicator, IndicatorState};
pub use moodlight::Moodlight;
pub use response::{Loop, Screen, Stats};
pub use settings::{AppColor, Settings};
pub use vocabulary::{
    DateFormat, EffectType, LifetimeMode, Palette, PushIcon, TextCase, TimeFormat, TransitionType,
    UnknownValue,
};
