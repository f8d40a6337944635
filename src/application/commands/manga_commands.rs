//! Manga Commands

use crate::domain::manga::{MangaId, MangaInput, UserId};

/// 保存阅读记录命令（input.id 为空时新建，否则更新）
#[derive(Debug, Clone)]
pub struct SaveManga {
    pub user: Option<UserId>,
    pub input: MangaInput,
}

/// 删除阅读记录命令
#[derive(Debug, Clone)]
pub struct DeleteManga {
    pub user: Option<UserId>,
    pub manga_id: MangaId,
}
