//! # 编排链路集成测试
//!
//! 测试 SlideshowController → TextTypist / ParticleField 的协同链路。
//! 这些测试不依赖真实的窗口、GPU 或音频设备。

use ambience::app::AppState;
use ambience::config::{AppConfig, ParticleConfig, SpeedRange};
use ambience::render::particles::ParticleField;
use ambience::render::typewriter::TextTypist;
use ambience::slideshow::{SlideshowAction, SlideshowController};
use ambience::texts::TextEntry;

/// 创建测试用编排器：2s 图片间隔、5s 文本间隔、1s 淡变
fn test_controller(entries: Vec<TextEntry>) -> SlideshowController {
    SlideshowController::new(entries, "……".to_string(), 2.0, 5.0, 1.0)
}

/// 把编排器动作应用到打字机（应用层粘合逻辑的最小版本）
fn apply(typist: &mut TextTypist, ctl: &mut SlideshowController, actions: Vec<SlideshowAction>) {
    for action in actions {
        match action {
            SlideshowAction::ShowImage { .. } => ctl.confirm_image_ready(),
            SlideshowAction::Prefetch { .. } => {}
            SlideshowAction::TypeText { text } => typist.type_text(text),
        }
    }
}

/// 测试启动后文本逐字符出现
#[test]
fn test_start_types_first_text() {
    let mut ctl = test_controller(vec![TextEntry::Literal("abc".to_string())]);
    let mut typist = TextTypist::new(SpeedRange { min: 0.0, max: 0.0 });

    let actions = ctl.start(vec!["a.png".to_string()]);
    apply(&mut typist, &mut ctl, actions);

    typist.update(0.016);
    assert_eq!(typist.visible_text(), "a");
    typist.update(0.016);
    assert_eq!(typist.visible_text(), "ab");
    typist.update(0.016);
    assert_eq!(typist.visible_text(), "abc");
}

/// 测试文本轮换会打断当前动画并立即开始新文本
#[test]
fn test_rotation_replaces_active_typing() {
    let mut ctl = test_controller(vec![TextEntry::Literal("xy".to_string())]);
    let mut typist = TextTypist::new(SpeedRange { min: 0.0, max: 0.0 });

    let actions = ctl.start(vec!["a.png".to_string()]);
    apply(&mut typist, &mut ctl, actions);
    typist.update(0.016);
    assert_eq!(typist.visible_text(), "x");

    // 到达文本轮换间隔：旧任务被取消，新文本立即开始
    let actions = ctl.update(5.1);
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, SlideshowAction::TypeText { .. }))
    );
    apply(&mut typist, &mut ctl, actions);
    typist.update(0.016);
    assert_eq!(typist.visible_text(), "x");
    assert_eq!(typist.queued(), 0);
}

/// 测试生成器条目在选中时求值
#[test]
fn test_generated_entry_resolves_at_selection() {
    use ambience::texts::GeneratorKind;

    let mut ctl = test_controller(vec![TextEntry::Generated {
        generator: GeneratorKind::DaysToNewYear,
    }]);

    let actions = ctl.start(Vec::new());
    let typed: Vec<&String> = actions
        .iter()
        .filter_map(|a| match a {
            SlideshowAction::TypeText { text } => Some(text),
            _ => None,
        })
        .collect();

    assert_eq!(typed.len(), 1);
    assert!(typed[0].contains("新年"));
}

/// 测试空图片列表的完整链路：始终占位图，永不崩溃
#[test]
fn test_empty_images_full_cycle() {
    let mut ctl = test_controller(vec![TextEntry::Literal("hi".to_string())]);
    let mut typist = TextTypist::new(SpeedRange { min: 0.0, max: 0.0 });

    let actions = ctl.start(Vec::new());
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, SlideshowAction::ShowImage { path: None }))
    );
    apply(&mut typist, &mut ctl, actions);

    // 跑满多个轮换周期
    for _ in 0..100 {
        let actions = ctl.update(0.1);
        for action in &actions {
            if let SlideshowAction::ShowImage { path } = action {
                assert!(path.is_none());
            }
        }
        apply(&mut typist, &mut ctl, actions);
        typist.update(0.1);
    }
    assert!(ctl.is_running());
}

/// 测试暂停时编排器与粒子一起冻结、一起恢复
#[test]
fn test_pause_coordinates_components() {
    let mut ctl = test_controller(vec![TextEntry::Literal("hi".to_string())]);
    let mut particles = ParticleField::new(&ParticleConfig::default(), 800.0, 600.0);

    ctl.start(vec!["a.png".to_string()]);
    ctl.confirm_image_ready();
    ctl.update(0.6);
    particles.spawn_raindrops(400.0, 300.0);
    let drops_before = particles.raindrop_count();

    // 统一暂停
    ctl.pause();
    particles.pause();

    for _ in 0..100 {
        assert!(ctl.update(1.0).is_empty());
        particles.update(1.0);
    }
    assert_eq!(particles.raindrop_count(), drops_before);
    assert!((ctl.image_alpha() - 1.0).abs() < f32::EPSILON);

    // 统一恢复后双方都继续推进
    ctl.resume();
    particles.resume();
    for _ in 0..400 {
        particles.update(0.016);
    }
    assert_eq!(particles.raindrop_count(), 0);
    assert!(!ctl.update(2.1).is_empty() || !ctl.update(0.6).is_empty());
}

/// 测试应用级清理：可重复调用，启动未完成时也安全
#[test]
fn test_app_cleanup_idempotent() {
    let mut app = AppState::new(AppConfig::default(), 800.0, 600.0);

    // 启动流程尚未完成时清理
    app.cleanup();
    assert!(!app.run_state.running);
    assert_eq!(app.typist.visible_text(), "");
    assert_eq!(app.particles.snowflake_count(), 0);
    assert!(!app.controller.is_running());

    // 再次清理无副作用
    app.cleanup();
    assert!(!app.controller.is_running());
}

/// 测试清理后的编排器不再产出任何动作
#[test]
fn test_disposed_controller_is_inert() {
    let mut ctl = test_controller(vec![TextEntry::Literal("hi".to_string())]);
    ctl.start(vec!["a.png".to_string()]);
    ctl.cleanup();

    for _ in 0..50 {
        assert!(ctl.update(1.0).is_empty());
    }
    assert!(ctl.start(vec!["b.png".to_string()]).is_empty());
}
