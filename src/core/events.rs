use bevy::prelude::*;

/// 统一的文字输出事件，由 main 里的转发系统打印
#[derive(Event)]
pub struct LogEvent(pub String);

pub fn hello_world(mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent("Pneuma demo 启动，输入 help 查看命令".into()));
}
