//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::num::NonZero;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::{events::LogEvent, states::AppState};
use crate::data::{UpgradeAssets, schema::UpgradeList};
use crate::upgrades::events::{
    AddAirEvent, InstallUpgradeEvent, ListUpgradesEvent, LoadToolEvent, RemoveUpgradeEvent,
    SaveToolEvent, SetCreativeEvent,
};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line_result in stdin.lock().lines() {
                    if let Ok(line) = line_result {
                        let line = line.trim();
                        if !line.is_empty() {
                            let mut buf = buffer.lock().unwrap();
                            buf.push_back(line.to_string());
                        }
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
enum Command {
    Help,
    Status,
    Exit,
    Upgrades(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Install { id: String, count: u32 },
    Remove { id: String, count: u32 },
    Installed,
    Creative(bool),
    Air { amount: i32 },
    Save(String),
    Load(String),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let mut buffer = CLI_BUFFER.lock().unwrap();
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    upgrade_assets: Res<UpgradeAssets>,
    lists: Res<Assets<UpgradeList>>,
    mut ev_install: EventWriter<InstallUpgradeEvent>,
    mut ev_remove: EventWriter<RemoveUpgradeEvent>,
    mut ev_list: EventWriter<ListUpgradesEvent>,
    mut ev_creative: EventWriter<SetCreativeEvent>,
    mut ev_air: EventWriter<AddAirEvent>,
    mut ev_save: EventWriter<SaveToolEvent>,
    mut ev_load: EventWriter<LoadToolEvent>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(
                    "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  upgrades               列出所有升级定义
  upgrades <token>       用 id / uuid / 名称 查询单个升级
  install <id> [n]       安装升级
  remove <id> [n]        拆卸升级
  installed              查看已安装升级与气压
  creative on|off        设置创造模式标记
  air <amount>           充气 / 放气（mL）
  save <file>            保存工具数据
  load <file>            读取工具数据
  ".into()));
            }

            Command::Status => {
                let cnt = upgrade_assets
                    .handle
                    .as_ref()
                    .and_then(|h| lists.get(h))
                    .map_or(0, |list| list.upgrades.len());
                log.write(LogEvent(format!(
                    "State: {:?}, Upgrades Loaded: {}",
                    state.get(),
                    cnt
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Error(NonZero::<u8>::MIN));
            }

            Command::Upgrades(token) => {
                if let Some(handle) = &upgrade_assets.handle {
                    if let Some(list) = lists.get(handle) {
                        match token {
                            None => {
                                // 全部列出
                                for entry in &list.upgrades {
                                    let uuid = uuid_from_id(&entry.id);
                                    log.write(LogEvent(format!(
                                        "{} | {} | {}",
                                        uuid, entry.id, entry.name
                                    )));
                                }
                            }
                            Some(t) => {
                                // 按三种字段模糊匹配
                                let t_low = t.to_lowercase();
                                if let Some(e) = list.upgrades.iter().find(|e| {
                                    e.id.eq_ignore_ascii_case(&t_low)
                                        || e.name.eq_ignore_ascii_case(&t_low)
                                        || uuid_from_id(&e.id).to_string() == t_low
                                }) {
                                    let uuid = uuid_from_id(&e.id);
                                    log.write(LogEvent(format!(
                                        "==================================================
UUID : {uuid}
ID   : {}
Name : {}
Max  : {}
Desc : {}
==================================================",
                                        e.id, e.name, e.max_count, e.description
                                    )));
                                } else {
                                    log.write(LogEvent("未找到匹配升级".into()));
                                }
                            }
                        }
                    }
                }
            }

            Command::Install { id, count } => {
                ev_install.write(InstallUpgradeEvent { id, count });
            }

            Command::Remove { id, count } => {
                ev_remove.write(RemoveUpgradeEvent { id, count });
            }

            Command::Installed => {
                ev_list.write(ListUpgradesEvent);
            }

            Command::Creative(on) => {
                ev_creative.write(SetCreativeEvent { on });
            }

            Command::Air { amount } => {
                ev_air.write(AddAirEvent { amount });
            }

            Command::Save(path) => {
                ev_save.write(SaveToolEvent { path });
            }

            Command::Load(path) => {
                ev_load.write(LoadToolEvent { path });
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "upgrades" | "upgrade" | "u" => {
            let token = parts.next().map(|s| s.to_string());
            Command::Upgrades(token)
        }
        "install" => {
            let id = parts.next().unwrap_or("").to_string();
            let cnt = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Command::Install { id, count: cnt }
        }
        "remove" => {
            let id = parts.next().unwrap_or("").to_string();
            let cnt = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Command::Remove { id, count: cnt }
        }
        "installed" | "inv" => Command::Installed,
        "creative" => {
            let on = matches!(parts.next().unwrap_or(""), "on" | "true" | "1");
            Command::Creative(on)
        }
        "air" => {
            let amount = parts.next().unwrap_or("0").parse().unwrap_or(0);
            Command::Air { amount }
        }
        "save" => Command::Save(parts.next().unwrap_or("tool.json").to_string()),
        "load" => Command::Load(parts.next().unwrap_or("tool.json").to_string()),
        other => Command::Unsupported(other.into()),
    }
}

fn uuid_from_id(id: &str) -> Uuid {
    // 用固定 namespace + id 字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}
