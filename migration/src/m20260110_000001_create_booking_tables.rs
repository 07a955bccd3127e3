use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建教师预约策略表
        manager
            .create_table(
                Table::create()
                    .table(BookingPolicies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingPolicies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingPolicies::CourseId).big_integer().null())
                    .col(
                        ColumnDef::new(BookingPolicies::RequiresApprovalForOneOnOne)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::RequiresApprovalForGroup)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::MinNoticeHours)
                            .big_integer()
                            .not_null()
                            .default(24),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::CancelWindowHours)
                            .big_integer()
                            .not_null()
                            .default(24),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::MaxBookingsPerDay)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建直播课场次表
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::Title).string().not_null())
                    .col(ColumnDef::new(Sessions::Description).text().null())
                    .col(ColumnDef::new(Sessions::StartAtUtc).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::EndAtUtc).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::TimezoneSnapshot)
                            .string()
                            .not_null()
                            .default("UTC"),
                    )
                    .col(ColumnDef::new(Sessions::Capacity).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::SeatsTaken)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sessions::EnableWaitlist)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sessions::Status).string().not_null())
                    .col(ColumnDef::new(Sessions::CancelledAt).big_integer().null())
                    .col(ColumnDef::new(Sessions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建预约表
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::BookingType).string().not_null())
                    .col(ColumnDef::new(Bookings::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::TeacherId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::StudentUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::SessionId).big_integer().null())
                    .col(ColumnDef::new(Bookings::StartAtUtc).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::EndAtUtc).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::SeatsReserved)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::StudentNote).text().null())
                    .col(ColumnDef::new(Bookings::TeacherNote).text().null())
                    .col(ColumnDef::new(Bookings::DecisionAt).big_integer().null())
                    .col(ColumnDef::new(Bookings::DecidedBy).big_integer().null())
                    .col(ColumnDef::new(Bookings::CancelledAt).big_integer().null())
                    .col(ColumnDef::new(Bookings::CancelledBy).big_integer().null())
                    .col(ColumnDef::new(Bookings::CancelReason).string().null())
                    .col(ColumnDef::new(Bookings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建候补名单表
        manager
            .create_table(
                Table::create()
                    .table(WaitlistEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaitlistEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::StudentUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WaitlistEntries::Status).string().not_null())
                    .col(
                        ColumnDef::new(WaitlistEntries::OfferExpiresAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(WaitlistEntries::OfferedAt).big_integer().null())
                    .col(
                        ColumnDef::new(WaitlistEntries::AcceptedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(WaitlistEntries::ExpiredAt).big_integer().null())
                    .col(
                        ColumnDef::new(WaitlistEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WaitlistEntries::Table, WaitlistEntries::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建周期预约系列表
        manager
            .create_table(
                Table::create()
                    .table(BookingSeries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingSeries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookingSeries::SeriesType).string().not_null())
                    .col(ColumnDef::new(BookingSeries::Status).string().not_null())
                    .col(
                        ColumnDef::new(BookingSeries::StudentUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeries::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingSeries::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(BookingSeries::Title).string().not_null())
                    .col(ColumnDef::new(BookingSeries::Frequency).string().not_null())
                    .col(
                        ColumnDef::new(BookingSeries::Interval)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(BookingSeries::OccurrenceCount)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(BookingSeries::UntilDate).big_integer().null())
                    .col(
                        ColumnDef::new(BookingSeries::StartAtUtc)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeries::DurationMinutes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingSeries::Capacity).big_integer().null())
                    .col(
                        ColumnDef::new(BookingSeries::EnableWaitlist)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BookingSeries::CancelledAt).big_integer().null())
                    .col(
                        ColumnDef::new(BookingSeries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeries::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建系列预约关联表
        manager
            .create_table(
                Table::create()
                    .table(BookingSeriesItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingSeriesItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingSeriesItems::SeriesId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeriesItems::BookingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeriesItems::SessionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeriesItems::OccurrenceIndex)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingSeriesItems::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BookingSeriesItems::Table, BookingSeriesItems::SeriesId)
                            .to(BookingSeries::Table, BookingSeries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BookingSeriesItems::Table, BookingSeriesItems::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 策略表：每个教师每门课程只能有一条策略
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_booking_policies_teacher_course")
                    .table(BookingPolicies::Table)
                    .col(BookingPolicies::TeacherId)
                    .col(BookingPolicies::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 场次表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_teacher_start")
                    .table(Sessions::Table)
                    .col(Sessions::TeacherId)
                    .col(Sessions::StartAtUtc)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_status")
                    .table(Sessions::Table)
                    .col(Sessions::Status)
                    .to_owned(),
            )
            .await?;

        // 预约表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_type_status")
                    .table(Bookings::Table)
                    .col(Bookings::BookingType)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_student_start")
                    .table(Bookings::Table)
                    .col(Bookings::StudentUserId)
                    .col(Bookings::StartAtUtc)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_teacher_start")
                    .table(Bookings::Table)
                    .col(Bookings::TeacherId)
                    .col(Bookings::StartAtUtc)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_session")
                    .table(Bookings::Table)
                    .col(Bookings::SessionId)
                    .to_owned(),
            )
            .await?;

        // 候补名单按 (场次, 学生) 查询；活跃记录唯一性在事务里保证，
        // 过期记录会保留，不能建唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waitlist_session_student")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::SessionId)
                    .col(WaitlistEntries::StudentUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waitlist_session_status")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::SessionId)
                    .col(WaitlistEntries::Status)
                    .to_owned(),
            )
            .await?;

        // 系列关联表：每个系列内的次序唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_series_items_series_index")
                    .table(BookingSeriesItems::Table)
                    .col(BookingSeriesItems::SeriesId)
                    .col(BookingSeriesItems::OccurrenceIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingSeriesItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookingSeries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WaitlistEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookingPolicies::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum BookingPolicies {
    Table,
    Id,
    TeacherId,
    CourseId,
    RequiresApprovalForOneOnOne,
    RequiresApprovalForGroup,
    MinNoticeHours,
    CancelWindowHours,
    MaxBookingsPerDay,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    CourseId,
    TeacherId,
    Title,
    Description,
    StartAtUtc,
    EndAtUtc,
    TimezoneSnapshot,
    Capacity,
    SeatsTaken,
    EnableWaitlist,
    Status,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    BookingType,
    CourseId,
    TeacherId,
    StudentUserId,
    SessionId,
    StartAtUtc,
    EndAtUtc,
    SeatsReserved,
    Status,
    StudentNote,
    TeacherNote,
    DecisionAt,
    DecidedBy,
    CancelledAt,
    CancelledBy,
    CancelReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WaitlistEntries {
    Table,
    Id,
    SessionId,
    StudentUserId,
    Status,
    OfferExpiresAt,
    OfferedAt,
    AcceptedAt,
    ExpiredAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BookingSeries {
    Table,
    Id,
    SeriesType,
    Status,
    StudentUserId,
    TeacherId,
    CourseId,
    Title,
    Frequency,
    Interval,
    OccurrenceCount,
    UntilDate,
    StartAtUtc,
    DurationMinutes,
    Capacity,
    EnableWaitlist,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BookingSeriesItems {
    Table,
    Id,
    SeriesId,
    BookingId,
    SessionId,
    OccurrenceIndex,
    CreatedAt,
}
