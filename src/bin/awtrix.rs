use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use awtrix_light::args::{Action, CliArgs};
use awtrix_light::{AwtrixClient, ContentBuilder, Indicator, IndicatorState, Moodlight, Notification};

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    return Ok(());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    let config = args.client_config().context("reading device configuration")?;
    log::info!("talking to {}", config.base_url());
    let client = AwtrixClient::new(config)?;

    match args.action {
        Action::Stats => print_json(&client.stats()?)?,
        Action::Screen => {
            // One row of the matrix per line.
            let screen = client.screen()?;
            for row in screen.to_ints().chunks(awtrix_light::response::MATRIX_WIDTH) {
                println!("{:?}", row);
            }
        }
        Action::Loop => print_json(client.loop_apps()?.apps())?,
        Action::Effects => print_json(&client.effects()?)?,
        Action::Transitions => {
            let names: Vec<&str> = client.transitions()?.iter().map(|t| t.name()).collect();
            print_json(&names)?;
        }
        Action::Power { state } => client.set_power(state.is_on())?,
        Action::Sleep { seconds } => client.sleep(seconds)?,
        Action::Sound { name } => client.play_sound(&name)?,
        Action::Rtttl { melody } => client.play_rtttl(&melody)?,
        Action::Notify {
            text,
            color,
            icon,
            duration,
            hold,
            sound,
        } => {
            let mut builder = Notification::builder().text(text).hold(hold);
            if let Some(color) = color {
                builder = builder.color(color);
            }
            if let Some(icon) = icon {
                builder = builder.icon(icon);
            }
            if let Some(duration) = duration {
                builder = builder.duration(duration);
            }
            if let Some(sound) = sound {
                builder = builder.sound(sound);
            }
            client.notify(&builder.build()?)?;
        }
        Action::Dismiss => client.dismiss_notification()?,
        Action::Next => client.next_app()?,
        Action::Previous => client.previous_app()?,
        Action::Switch { name } => client.switch_app(&name)?,
        Action::Indicator {
            number,
            color,
            blink,
            fade,
        } => {
            let indicator = Indicator::try_from(number)?;
            match color {
                Some(color) => client.set_indicator(indicator, &IndicatorState::new(color, blink, fade)?)?,
                None => client.hide_indicator(indicator)?,
            }
        }
        Action::Moodlight {
            brightness,
            kelvin,
            color,
        } => client.set_moodlight(&Moodlight::new(brightness, kelvin, color)?)?,
        Action::Settings => print_json(&client.settings()?)?,
        Action::Reboot => client.reboot()?,
        Action::Update => client.update_firmware()?,
    }
    return Ok(());
}
