use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub(super) enum TelegramUsers {
    Table,
    Id,
    FirstName,
    Username,
    LastActiveAt,
}

#[derive(Iden, Clone, Copy)]
pub(super) enum Messages {
    Table,
    MessageText,
    CreatedAt,
    TelegramUserId,
}
