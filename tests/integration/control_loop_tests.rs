//! Integration tests for the ControlLoop → HysteresisController → actuator
//! pipeline, including the stop protocol across threads.

use std::time::{Duration, Instant};

use crate::mock_hw::{ActuatorCall, MockActuator, RecordingSink, ScriptedSensor};

use fanctl::app::events::AppEvent;
use fanctl::config::ControllerConfig;
use fanctl::{
    ActuatorError, ActuatorState, ConfigError, ControlLoop, ControllerStatus, Decision, SensorError,
    Thresholds,
};

type TestLoop = ControlLoop<ScriptedSensor, MockActuator, RecordingSink>;

fn make_loop(sensor: ScriptedSensor, actuator: MockActuator, interval: Duration) -> TestLoop {
    let thresholds = Thresholds::new(65.0, 55.0).unwrap();
    ControlLoop::new(thresholds, interval, sensor, actuator, RecordingSink::new()).unwrap()
}

/// Build a loop whose sensor stops it after the last scripted reading.
fn scripted_run(script: Vec<Result<f32, SensorError>>, actuator: MockActuator) -> TestLoop {
    let mut l = make_loop(ScriptedSensor::new(script), actuator, Duration::from_millis(1));
    let h = l.handle();
    l.sensor_mut().stop_after_script(h);
    l
}

// ── Reading sequence ──────────────────────────────────────────

#[test]
fn reading_sequence_turns_fan_on_then_off() {
    let mut l = scripted_run(
        [50.0, 60.0, 70.0, 62.0, 50.0].into_iter().map(Ok).collect(),
        MockActuator::new(),
    );

    let report = l.start();

    assert_eq!(
        l.sink().decisions(),
        [
            (1, Decision::NoChange),
            (2, Decision::NoChange),
            (3, Decision::TurnOn),
            (4, Decision::NoChange),
            (5, Decision::TurnOff),
        ]
    );
    // On, Off from the ticks; one more Off from shutdown.
    assert_eq!(
        l.actuator().applied(),
        [ActuatorState::On, ActuatorState::Off, ActuatorState::Off]
    );
    assert_eq!(report.ticks, 5);
    assert_eq!(report.transitions, 2);
    assert_eq!(report.final_state, ActuatorState::Off);
    assert!(report.shutdown_clean);
    assert_eq!(l.status(), ControllerStatus::Stopped);
}

#[test]
fn readings_inside_band_never_command() {
    let mut l = scripted_run(
        [56.0, 60.0, 64.9, 65.0, 55.0].into_iter().map(Ok).collect(),
        MockActuator::new(),
    );

    let report = l.start();

    assert_eq!(report.transitions, 0);
    // Only the shutdown command.
    assert_eq!(l.actuator().applied(), [ActuatorState::Off]);
}

#[test]
fn hot_start_stays_on_until_below_off_threshold() {
    let mut l = scripted_run(
        [80.0, 70.0, 60.0, 56.0, 54.0].into_iter().map(Ok).collect(),
        MockActuator::new(),
    );

    l.start();

    let decisions: Vec<Decision> = l.sink().decisions().into_iter().map(|(_, d)| d).collect();
    assert_eq!(
        decisions,
        [
            Decision::TurnOn,
            Decision::NoChange,
            Decision::NoChange,
            Decision::NoChange,
            Decision::TurnOff,
        ]
    );
}

// ── Fault handling ────────────────────────────────────────────

#[test]
fn read_failure_skips_one_tick_and_keeps_running() {
    let mut l = scripted_run(
        vec![
            Ok(50.0),
            Ok(70.0),
            Err(SensorError::ReadFailed),
            Ok(70.0),
            Ok(50.0),
        ],
        MockActuator::new(),
    );

    let report = l.start();

    assert_eq!(l.sink().read_failures(), [3]);
    assert_eq!(report.read_failures, 1);
    assert_eq!(report.ticks, 5);

    // Tick 3 produced no decision; state stayed On across it.
    let decisions = l.sink().decisions();
    assert_eq!(decisions.len(), 4);
    assert!(decisions.iter().all(|(t, _)| *t != 3));
    assert_eq!(decisions[2], (4, Decision::NoChange));
    assert_eq!(decisions[3], (5, Decision::TurnOff));
}

#[test]
fn unparseable_and_out_of_range_are_skipped_like_read_errors() {
    let mut l = scripted_run(
        vec![
            Err(SensorError::Unparseable),
            Err(SensorError::OutOfRange),
            Ok(70.0),
        ],
        MockActuator::new(),
    );

    let report = l.start();

    assert_eq!(report.read_failures, 2);
    assert_eq!(l.sink().read_failures(), [1, 2]);
    assert_eq!(l.sink().decisions(), [(3, Decision::TurnOn)]);
}

#[test]
fn failed_command_is_retried_next_tick() {
    let mut l = scripted_run(
        [70.0, 70.0, 70.0].into_iter().map(Ok).collect(),
        MockActuator::failing(1),
    );

    let report = l.start();

    assert_eq!(
        l.actuator().calls,
        [
            ActuatorCall::Failed(ActuatorState::On),
            ActuatorCall::Set(ActuatorState::On),
            ActuatorCall::Set(ActuatorState::Off), // shutdown
        ]
    );
    assert_eq!(report.actuator_failures, 1);
    assert_eq!(report.transitions, 1);

    let failed: Vec<_> = l
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::CommandFailed { .. }))
        .cloned()
        .collect();
    assert_eq!(
        failed,
        [AppEvent::CommandFailed {
            tick: 1,
            intended: ActuatorState::On,
            error: ActuatorError::GpioWriteFailed,
        }]
    );
}

#[test]
fn failed_shutdown_is_reported_unclean() {
    let mut l = scripted_run(vec![Ok(50.0)], MockActuator::broken());

    let report = l.start();

    assert!(!report.shutdown_clean);
    assert_eq!(l.status(), ControllerStatus::Stopped);
    assert!(l.actuator().applied().is_empty());
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn inverted_thresholds_refuse_to_build_a_loop() {
    let cfg = ControllerConfig {
        on_threshold_c: 55.0,
        off_threshold_c: 55.0,
        ..ControllerConfig::default()
    };
    let r = ControlLoop::from_config(
        &cfg,
        ScriptedSensor::constant(20.0),
        MockActuator::new(),
        RecordingSink::new(),
    );
    assert!(matches!(r, Err(ConfigError::ThresholdsInverted { .. })));
}

#[test]
fn negative_poll_interval_is_rejected() {
    let cfg = ControllerConfig {
        poll_interval_secs: -1.0,
        ..ControllerConfig::default()
    };
    let r = ControlLoop::from_config(
        &cfg,
        ScriptedSensor::constant(20.0),
        MockActuator::new(),
        RecordingSink::new(),
    );
    assert!(matches!(r, Err(ConfigError::NonPositivePollInterval)));
}

// ── Lifecycle / termination ───────────────────────────────────

#[test]
fn terminate_before_start_runs_no_tick() {
    let mut l = make_loop(
        ScriptedSensor::constant(90.0),
        MockActuator::new(),
        Duration::from_secs(30),
    );
    assert!(l.terminate());

    let report = l.start();

    assert_eq!(report.ticks, 0);
    assert_eq!(l.sensor().reads, 0);
    assert_eq!(l.actuator().applied(), [ActuatorState::Off]);
    assert_eq!(l.status(), ControllerStatus::Stopped);
    assert_eq!(
        l.sink().events,
        [
            AppEvent::StatusChanged {
                from: ControllerStatus::Idle,
                to: ControllerStatus::Stopping,
            },
            AppEvent::StatusChanged {
                from: ControllerStatus::Stopping,
                to: ControllerStatus::Stopped,
            },
        ]
    );
}

#[test]
fn terminate_cuts_long_poll_interval_short() {
    let mut l = make_loop(
        ScriptedSensor::constant(70.0),
        MockActuator::new(),
        Duration::from_secs(30),
    );
    let h = l.handle();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        h.terminate()
    });

    let begin = Instant::now();
    let report = l.start();
    let elapsed = begin.elapsed();

    assert!(stopper.join().unwrap());
    assert!(elapsed < Duration::from_secs(5), "stop took {:?}", elapsed);
    assert_eq!(report.ticks, 1);
    assert_eq!(
        l.actuator().applied(),
        [ActuatorState::On, ActuatorState::Off]
    );
}

#[test]
fn concurrent_terminates_shut_down_once() {
    let mut l = make_loop(
        ScriptedSensor::constant(70.0),
        MockActuator::new(),
        Duration::from_secs(30),
    );
    let h = l.handle();

    let stoppers: Vec<_> = (0..4)
        .map(|_| {
            let h = h.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                h.terminate()
            })
        })
        .collect();

    let report = l.start();
    let winners = stoppers
        .into_iter()
        .map(|t| t.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert!(report.shutdown_clean);
    // One On from the first tick, exactly one Off from shutdown.
    assert_eq!(l.actuator().off_commands(), 1);
    let stopped = l
        .sink()
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                AppEvent::StatusChanged {
                    to: ControllerStatus::Stopped,
                    ..
                }
            )
        })
        .count();
    assert_eq!(stopped, 1);
}

#[test]
fn background_loop_publishes_actuator_state() {
    let mut l = make_loop(
        ScriptedSensor::constant(70.0),
        MockActuator::new(),
        Duration::from_millis(10),
    );
    let h = l.handle();

    let worker = std::thread::spawn(move || {
        let report = l.start();
        (report, l.actuator().applied())
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while h.actuator_state() != ActuatorState::On && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(h.actuator_state(), ActuatorState::On);
    assert_eq!(h.status(), ControllerStatus::Running);

    assert!(h.terminate());
    assert!(h.wait_stopped(Duration::from_secs(5)));
    assert_eq!(h.actuator_state(), ActuatorState::Off);

    let (report, applied) = worker.join().unwrap();
    assert!(report.ticks >= 1);
    assert_eq!(applied, [ActuatorState::On, ActuatorState::Off]);
}

#[test]
fn stop_during_tick_lets_the_command_land() {
    // The stop arrives while the sensor is being read; the TurnOn from
    // that same tick must still reach the actuator before shutdown.
    let mut l = scripted_run(vec![Ok(70.0)], MockActuator::new());

    let report = l.start();

    assert_eq!(report.ticks, 1);
    assert_eq!(l.sink().decisions(), [(1, Decision::TurnOn)]);
    assert_eq!(
        l.actuator().applied(),
        [ActuatorState::On, ActuatorState::Off]
    );
}

#[test]
fn lifecycle_events_bracket_the_run() {
    let mut l = scripted_run(vec![Ok(50.0)], MockActuator::new());
    l.start();

    let events = &l.sink().events;
    assert_eq!(
        events.first(),
        Some(&AppEvent::StatusChanged {
            from: ControllerStatus::Idle,
            to: ControllerStatus::Running,
        })
    );
    assert!(events.contains(&AppEvent::Started {
        on_threshold: 65.0,
        off_threshold: 55.0,
    }));
    assert!(events.contains(&AppEvent::StatusChanged {
        from: ControllerStatus::Running,
        to: ControllerStatus::Stopping,
    }));
    assert_eq!(
        events.last(),
        Some(&AppEvent::StatusChanged {
            from: ControllerStatus::Stopping,
            to: ControllerStatus::Stopped,
        })
    );
}
