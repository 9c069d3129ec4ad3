//! # Error Codebook
//!
//! Static table of every return code the fiscal register driver can report,
//! with its symbolic name and the vendor's (Russian) description.
//!
//! ## Code Ranges
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0          OK                                                          │
//! │  1 - 15     Driver / connection                                         │
//! │  16 - 269   Register and fiscal drive (FN)                              │
//! │  401 - 426  Marking codes                                               │
//! │  501 - 504  JSON task processing                                        │
//! │  601 - 603  Remote connection server (RCP)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is sorted by code; lookups are a binary search.

use serde::Serialize;

// =============================================================================
// Well-known Codes
// =============================================================================

/// Codes the session layer reacts to.
pub mod codes {
    pub const OK: i32 = 0;
    pub const CONNECTION_DISABLED: i32 = 1;
    pub const NO_CONNECTION: i32 = 2;
    pub const PORT_BUSY: i32 = 3;
    pub const INCORRECT_DATA: i32 = 5;
    pub const INVALID_PARAM: i32 = 13;
    pub const NO_PAPER: i32 = 44;
    pub const NOT_FULLY_PAID: i32 = 66;
    pub const SHIFT_EXPIRED: i32 = 68;
    pub const DENIED_IN_CLOSED_SHIFT: i32 = 73;
    pub const NO_CASH: i32 = 80;
    pub const DENIED_IN_CLOSED_RECEIPT: i32 = 81;
    pub const DENIED_IN_OPENED_RECEIPT: i32 = 82;
    pub const DENIED_IN_OPENED_SHIFT: i32 = 83;
    pub const FN_SHIFT_EXPIRED: i32 = 141;
    pub const CONNECTION_LOST: i32 = 241;
    pub const MINIPOS_COMMAND_TIME_OUT: i32 = 262;
    pub const RCP_SERVER_BUSY: i32 = 601;
    pub const RCP_SERVER_EXCHANGE: i32 = 603;
}

/// Codes after which the register may or may not have executed the command.
const OUTCOME_UNKNOWN_CODES: &[i32] = &[
    codes::NO_CONNECTION,
    codes::INCORRECT_DATA,
    codes::CONNECTION_LOST,
    codes::MINIPOS_COMMAND_TIME_OUT,
    codes::RCP_SERVER_EXCHANGE,
];

// =============================================================================
// Entry Type
// =============================================================================

/// One row of the codebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodebookEntry {
    pub code: i32,
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(code: i32, name: &'static str, description: &'static str) -> CodebookEntry {
    CodebookEntry {
        code,
        name,
        description,
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Finds the entry for a driver return code.
///
/// ```rust
/// use kkt_core::codebook::lookup;
///
/// assert_eq!(lookup(66).unwrap().name, "NOT_FULLY_PAID");
/// assert!(lookup(9999).is_none());
/// ```
pub fn lookup(code: i32) -> Option<&'static CodebookEntry> {
    CODEBOOK
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|idx| &CODEBOOK[idx])
}

/// The whole codebook, sorted by code.
pub fn list_codes() -> &'static [CodebookEntry] {
    CODEBOOK
}

/// True for transport-level codes: the command may have reached the
/// register, so its effect must be checked before retrying.
pub fn is_outcome_unknown(code: i32) -> bool {
    OUTCOME_UNKNOWN_CODES.contains(&code)
}

// =============================================================================
// Table
// =============================================================================

static CODEBOOK: &[CodebookEntry] = &[
    entry(0, "OK", "Ошибок нет"),
    entry(1, "CONNECTION_DISABLED", "Соединение не установлено"),
    entry(2, "NO_CONNECTION", "Нет связи"),
    entry(3, "PORT_BUSY", "Порт занят"),
    entry(4, "PORT_NOT_AVAILABLE", "Порт недоступен"),
    entry(5, "INCORRECT_DATA", "Некорректные данные от устройства"),
    entry(6, "INTERNAL", "Внутренняя ошибка библиотеки"),
    entry(7, "UNSUPPORTED_CAST", "Неподдерживаемое преобразование типа параметра"),
    entry(8, "NO_REQUIRED_PARAM", "Не найден обязательный параметр"),
    entry(9, "INVALID_SETTINGS", "Некорректные настройки"),
    entry(10, "NOT_CONFIGURED", "Драйвер не настроен"),
    entry(11, "NOT_SUPPORTED", "Не поддерживается в данной версии"),
    entry(12, "INVALID_MODE", "Не поддерживается в данном режиме"),
    entry(13, "INVALID_PARAM", "Некорректное значение параметра"),
    entry(14, "NOT_LOADED", "Не удалось загрузить библиотеку"),
    entry(15, "UNKNOWN", "Неизвестная ошибка"),
    entry(16, "INVALID_SUM", "Неверная цена (сумма)"),
    entry(17, "INVALID_QUANTITY", "Неверное количество"),
    entry(18, "CASH_COUNTER_OVERFLOW", "Переполнение счетчика наличности"),
    entry(19, "LAST_OPERATION_STORNO_DENIED", "Невозможно сторно последней операции"),
    entry(20, "STORNO_BY_CODE_DENIED", "Сторно по коду невозможно"),
    entry(21, "LAST_OPERATION_NOT_REPEATABLE", "Невозможен повтор последней операции"),
    entry(22, "DISCOUNT_NOT_REPEATABLE", "Повторная скидка на операцию невозможна"),
    entry(23, "DISCOUNT_DENIED", "Невозможно начислить скидку/надбавку"),
    entry(24, "INVALID_COMMODITY_CODE", "Неверный код товара"),
    entry(25, "INVALID_COMMODITY_BARCODE", "Неверный штрихкод товара"),
    entry(26, "INVALID_COMMAND_FORMAT", "Неверный формат команды"),
    entry(27, "INVALID_COMMAND_LENGTH", "Неверная длина"),
    entry(28, "BLOCKED_IN_DATE_INPUT_MODE", "ККТ заблокирована в режиме ввода даты"),
    entry(29, "NEED_DATE_ACCEPT", "Требуется подтверждение ввода даты"),
    entry(30, "NO_MORE_DATA", "Нет больше данных"),
    entry(31, "NO_ACCEPT_OR_CANCEL", "Нет подтверждения или отмены продажи"),
    entry(32, "BLOCKED_BY_REPORT_INTERRUPTION", "Отчет о закрытии смены прерван"),
    entry(33, "DISABLE_CASH_CONTROL_DENIED", "Отключение контроля наличности невозможно"),
    entry(34, "MODE_BLOCKED", "Вход в режим заблокирован"),
    entry(35, "CHECK_DATE_TIME", "Проверьте дату и время"),
    entry(36, "DATE_TIME_LESS_THAN_FS", "Дата/время меньше даты/времени последнего ФД"),
    entry(37, "CLOSE_ARCHIVE_DENIED", "Невозможно закрыть архив"),
    entry(38, "COMMODITY_NOT_FOUND", "Товар не найден"),
    entry(39, "WEIGHT_BARCODE_WITH_INVALID_QUANTITY", "Весовой штрихкод с количеством <> 1.000"),
    entry(40, "RECEIPT_BUFFER_OVERFLOW", "Переполнение буфера чека"),
    entry(41, "QUANTITY_TOO_FEW", "Недостаточное количество товара"),
    entry(42, "STORNO_TOO_MUCH", "Сторнируемое количество больше проданного"),
    entry(43, "BLOCKED_COMMODITY_NOT_FOUND", "Товар не найден"),
    entry(44, "NO_PAPER", "Нет бумаги"),
    entry(45, "COVER_OPENED", "Открыта крышка"),
    entry(46, "PRINTER_FAULT", "Нет связи с принтером чеков"),
    entry(47, "MECHANICAL_FAULT", "Механическая ошибка печатающего устройства"),
    entry(48, "INVALID_RECEIPT_TYPE", "Неверный тип чека"),
    entry(49, "INVALID_UNIT_TYPE", "Недопустимое целевое устройство"),
    entry(50, "NO_MEMORY", "Нет места в массиве картинок/штрихкодов"),
    entry(51, "PICTURE_NOT_FOUND", "Неверный номер картинки/штрихкода"),
    entry(52, "NONCACH_PAYMENTS_TOO_MUCH", "Сумма не наличных платежей превышает сумму чека"),
    entry(53, "RETURN_DENIED", "Накопление меньше суммы возврата или аннулирования"),
    entry(54, "PAYMENTS_OVERFLOW", "Переполнение суммы платежей"),
    entry(55, "BUSY", "Предыдущая операция незавершена"),
    entry(56, "GSM", "Ошибка GSM-модуля"),
    entry(57, "INVALID_DISCOUNT", "Неверная величина скидки / надбавки"),
    entry(58, "OPERATION_AFTER_DISCOUNT_DENIED", "Операция после скидки / надбавки невозможна"),
    entry(59, "INVALID_DEPARTMENT", "Неверная секция"),
    entry(60, "INVALID_PAYMENT_TYPE", "Неверный вид оплаты"),
    entry(61, "MULTIPLICATION_OVERFLOW", "Переполнение при умножении"),
    entry(62, "DENIED_BY_SETTINGS", "Операция запрещена в таблице настроек"),
    entry(63, "TOTAL_OVERFLOW", "Переполнение итога чека"),
    entry(64, "DENIED_IN_ANNULATION_RECEIPT", "Открыт чек аннулирования"),
    entry(65, "JOURNAL_OVERFLOW", "Переполнение буфера ЭЖ"),
    entry(66, "NOT_FULLY_PAID", "Чек оплачен не полностью"),
    entry(67, "DENIED_IN_RETURN_RECEIPT", "Открыт чек возврата"),
    entry(68, "SHIFT_EXPIRED", "Смена превысила 24 часа"),
    entry(69, "DENIED_IN_SELL_RECEIPT", "Открыт чек продажи"),
    entry(70, "FISCAL_MEMORY_OVERFLOW", "Переполнение ФП"),
    entry(71, "INVALID_PASSWORD", "Неверный пароль"),
    entry(72, "JOURNAL_BUSY", "Идет обработка ЭЖ"),
    entry(73, "DENIED_IN_CLOSED_SHIFT", "Смена закрыта"),
    entry(74, "INVALID_TABLE_NUMBER", "Неверный номер таблицы"),
    entry(75, "INVALID_ROW_NUMBER", "Неверный номер ряда"),
    entry(76, "INVALID_FIELD_NUMBER", "Неверный номер поля"),
    entry(77, "INVALID_DATE_TIME", "Неверная дата и/или время"),
    entry(78, "INVALID_STORNO_SUM", "Неверная сумма сторно"),
    entry(79, "CHANGE_CALCULATION", "Подсчет суммы сдачи невозможен"),
    entry(80, "NO_CASH", "В ККТ нет денег для выплаты"),
    entry(81, "DENIED_IN_CLOSED_RECEIPT", "Чек закрыт"),
    entry(82, "DENIED_IN_OPENED_RECEIPT", "Чек открыт"),
    entry(83, "DENIED_IN_OPENED_SHIFT", "Смена открыта"),
    entry(84, "SERIAL_NUMBER_ALREADY_ENTERED", "Серийный номер / MAC-адрес уже задан"),
    entry(85, "TOO_MUCH_REREGISTRATIONS", "Исчерпан лимит перерегистраций"),
    entry(86, "INVALID_SHIFT_NUMBER", "Неверный номер смены"),
    entry(87, "INVALID_SERIAL_NUMBER", "Недопустимый серийный номер ККТ"),
    entry(88, "INVALID_RNM_VATIN", "Недопустимый РНМ и/или ИНН"),
    entry(89, "FISCAL_PRINTER_NOT_ACTIVATED", "ККТ не зарегистрирована"),
    entry(90, "SERIAL_NUMBER_NOT_ENTERED", "Не задан серийный номер"),
    entry(91, "NO_MORE_REPORTS", "Нет отчетов"),
    entry(92, "MODE_NOT_ACTIVATED", "Режим не активизирован"),
    entry(93, "RECORD_NOT_FOUND_IN_JOURNAL", "Данные документа отсутствуют"),
    entry(94, "INVALID_LICENSE", "Некорректный код защиты / лицензия"),
    entry(95, "NEED_FULL_RESET", "Требуется выполнение общего гашения"),
    entry(96, "DENIED_BY_LICENSE", "Команда не разрешена кодами защиты"),
    entry(97, "DISCOUNT_CANCELLATION_DENIED", "Невозможна отмена скидки/надбавки"),
    entry(98, "CLOSE_RECEIPT_DENIED", "Невозможно закрыть чек данным типом оплаты"),
    entry(99, "INVALID_ROUTE_NUMBER", "Неверный номер маршрута"),
    entry(100, "INVALID_START_ZONE_NUMBER", "Неверный номер начальной зоны"),
    entry(101, "INVALID_END_ZONE_NUMBER", "Неверный номер конечной зоны"),
    entry(102, "INVALID_RATE_TYPE", "Неверный тип тарифа"),
    entry(103, "INVALID_RATE", "Неверный тариф"),
    entry(104, "FISCAL_MODULE_EXCHANGE", "Ошибка обмена с фискальным модулем"),
    entry(105, "NEED_TECHNICAL_SUPPORT", "Необходимо провести профилактические работы"),
    entry(106, "SHIFT_NUMBERS_DID_NOT_MATCH", "Неверные номера смен в ККТ и ФН"),
    entry(107, "DEVICE_NOT_FOUND", "Нет устройства"),
    entry(108, "EXTERNAL_DEVICE_CONNECTION", "Нет связи с внешним устройством"),
    entry(109, "DISPENSER_INVALID_STATE", "Ошибочное состояние ТРК"),
    entry(110, "INVALID_POSITIONS_COUNT", "Недопустимое кол-во позиций в чеке"),
    entry(111, "DISPENSER_INVALID_NUMBER", "Ошибочный номер ТРК"),
    entry(112, "INVALID_DIVIDER", "Неверный делитель"),
    entry(113, "FN_ACTIVATION_DENIED", "Активация данного ФН невозможна"),
    entry(114, "PRINTER_OVERHEAT", "Перегрев головки принтера"),
    entry(115, "FN_EXCHANGE", "Ошибка обмена с ФН на уровне I2C"),
    entry(116, "FN_INVALID_FORMAT", "Ошибка формата передачи ФН"),
    entry(117, "FN_INVALID_STATE", "Неверное состояние ФН"),
    entry(118, "FN_FAULT", "Неисправимая ошибка ФН"),
    entry(119, "FN_CRYPTO_FAULT", "Ошибка КС ФН"),
    entry(120, "FN_EXPIRED", "Закончен срок эксплуатации ФН"),
    entry(121, "FN_OVERFLOW", "Архив ФН переполнен"),
    entry(122, "FN_INVALID_DATE_TIME", "В ФН переданы неверная дата или время"),
    entry(123, "FN_NO_MORE_DATA", "В ФН нет запрошенных данных"),
    entry(124, "FN_TOTAL_OVERFLOW", "Переполнение ФН (итог чека)"),
    entry(125, "BUFFER_OVERFLOW", "Буфер переполнен"),
    entry(126, "PRINT_SECOND_COPY_DENIED", "Невозможно напечатать вторую фискальную копию"),
    entry(127, "NEED_RESET_JOURNAL", "Требуется гашение ЭЖ"),
    entry(128, "TAX_SUM_TOO_MUCH", "Некорректная сумма налога"),
    entry(129, "TAX_ON_LAST_OPERATION_DENIED", "Начисление налога на последнюю операцию невозможно"),
    entry(130, "INVALID_FN_NUMBER", "Неверный номер ФН"),
    entry(131, "TAX_CANCEL_DENIED", "Сумма сторно налога больше зарегистрированного"),
    entry(132, "LOW_BATTERY", "Недостаточно питания"),
    entry(133, "FN_INVALID_COMMAND", "Некорректное значение параметров команды ФН"),
    entry(134, "FN_COMMAND_OVERFLOW", "Превышение размеров TLV данных ФН"),
    entry(135, "FN_NO_TRANSPORT_CONNECTION", "Нет транспортного соединения ФН"),
    entry(136, "FN_CRYPTO_HAS_EXPIRED", "Исчерпан ресурс КС ФН"),
    entry(137, "FN_RESOURCE_HAS_EXPIRED", "Ресурс хранения ФД исчерпан"),
    entry(138, "INVALID_MESSAGE_FROM_OFD", "Сообщение от ОФД не может быть принято ФН"),
    entry(139, "FN_HAS_NOT_SEND_DOCUMENTS", "В ФН есть неотправленные ФД"),
    entry(140, "FN_TIMEOUT", "Исчерпан ресурс ожидания передачи сообщения в ФН"),
    entry(141, "FN_SHIFT_EXPIRED", "Продолжительность смены ФН более 24 часов"),
    entry(142, "FN_INVALID_TIME_DIFFERENCE", "Неверная разница во времени"),
    entry(143, "INVALID_TAXATION_TYPE", "Некорректная СНО"),
    entry(144, "INVALID_TAX_TYPE", "Недопустимый номер ставки налога"),
    entry(145, "INVALID_COMMODITY_PAYMENT_TYPE", "Недопустимый тип оплаты товара"),
    entry(146, "INVALID_COMMODITY_CODE_TYPE", "Недопустимый тип кода товара"),
    entry(147, "EXCISABLE_COMMODITY_DENIED", "Недопустима регистрация подакцизного товара"),
    entry(148, "FISCAL_PROPERTY_WRITE", "Ошибка программирования реквизита"),
    entry(149, "INVALID_COUNTER_TYPE", "Неверный тип счетчика"),
    entry(150, "CUTTER_FAULT", "Ошибка отрезчика"),
    entry(151, "REPORT_INTERRUPTED", "Снятие отчета прервалось"),
    entry(152, "INVALID_LEFT_MARGIN", "Недопустимое значение отступа слева"),
    entry(153, "INVALID_ALIGNMENT", "Недопустимое значение выравнивания"),
    entry(154, "INVALID_TAX_MODE", "Недопустимое значение режима работы с налогом"),
    entry(155, "FILE_NOT_FOUND", "Файл не найден или неверный формат"),
    entry(156, "PICTURE_TOO_BIG", "Размер картинки слишком большой"),
    entry(157, "INVALID_BARCODE_PARAMS", "Не удалось сформировать штрихкод"),
    entry(158, "FISCAL_PROPERTY_DENIED", "Неразрешенные реквизиты"),
    entry(159, "FN_INTERFACE", "Ошибка интерфейса ФН"),
    entry(160, "DATA_DUPLICATE", "Дублирование данных"),
    entry(161, "NO_REQUIRED_FISCAL_PROPERTY", "Не указаны обязательные реквизиты"),
    entry(162, "FN_READ_DOCUMENT", "Ошибка чтения документа из ФН"),
    entry(163, "FLOAT_OVERFLOW", "Переполнение чисел с плавающей точкой"),
    entry(164, "INVALID_SETTING_VALUE", "Неверное значение параметра ККТ"),
    entry(165, "HARD_FAULT", "Внутренняя ошибка ККТ"),
    entry(166, "FN_NOT_FOUND", "ФН не найден"),
    entry(167, "INVALID_AGENT_FISCAL_PROPERTY", "Невозможно записать реквизит агента"),
    entry(168, "INVALID_FISCAL_PROPERTY_VALUE_1002_1056", "Недопустимое сочетание 1002 и 1056"),
    entry(169, "INVALID_FISCAL_PROPERTY_VALUE_1002_1017", "Недопустимое сочетание 1002 и 1017"),
    entry(170, "SCRIPT", "Ошибка скриптового движка ККТ"),
    entry(171, "INVALID_USER_MEMORY_INDEX", "Неверный номер пользовательской ячейки памяти"),
    entry(172, "NO_ACTIVE_OPERATOR", "Кассир не зарегистрирован"),
    entry(173, "REGISTRATION_REPORT_INTERRUPTED", "Отчет о регистрации ККТ прерван"),
    entry(174, "CLOSE_FN_REPORT_INTERRUPTED", "Отчет о закрытии ФН прерван"),
    entry(175, "OPEN_SHIFT_REPORT_INTERRUPTED", "Отчет об открытии смены прерван"),
    entry(176, "OFD_EXCHANGE_REPORT_INTERRUPTED", "Отчет о состоянии расчетов прерван"),
    entry(177, "CLOSE_RECEIPT_INTERRUPTED", "Закрытие чека прервано"),
    entry(178, "FN_QUERY_INTERRUPTED", "Получение документа из ФН прервано"),
    entry(179, "RTC_FAULT", "Сбой часов"),
    entry(180, "MEMORY_FAULT", "Сбой памяти"),
    entry(181, "CHIP_FAULT", "Сбой микросхемы"),
    entry(182, "TEMPLATES_CORRUPTED", "Ошибка шаблонов документов"),
    entry(183, "INVALID_MAC_ADDRESS", "Недопустимое значение MAC-адреса"),
    entry(184, "INVALID_SCRIPT_NUMBER", "Неверный тип (номер) шаблона"),
    entry(185, "SCRIPTS_FAULT", "Загруженные шаблоны повреждены или отсутствуют"),
    entry(186, "INVALID_SCRIPTS_VERSION", "Несовместимая версия загруженных шаблонов"),
    entry(187, "INVALID_CLICHE_FORMAT", "Ошибка в формате клише"),
    entry(188, "WAIT_FOR_REBOOT", "Требуется перезагрузка ККТ"),
    entry(189, "NO_LICENSE", "Подходящие лицензии не найдены"),
    entry(190, "INVALID_FFD_VERSION", "Неверная версия ФФД"),
    entry(191, "CHANGE_SETTING_DENIED", "Параметр доступен только для чтения"),
    entry(192, "INVALID_NOMENCLATURE_TYPE", "Неверный тип кода товара"),
    entry(193, "INVALID_GTIN", "Неверное значение GTIN"),
    entry(194, "NEGATIVE_MATH_RESULT", "Отрицательный результат математической операции"),
    entry(195, "FISCAL_PROPERTIES_COMBINATION", "Недопустимое сочетание реквизитов"),
    entry(196, "OPERATOR_LOGIN", "Не удалось зарегистрировать кассира"),
    entry(197, "INVALID_INTERNET_CHANNEL", "Данный канал Интернет отсутствует в ККТ"),
    entry(198, "DATETIME_NOT_SYNCRONIZED", "Дата и время не синхронизированы"),
    entry(199, "JOURNAL", "Ошибка электронного журнала"),
    entry(200, "DENIED_IN_OPENED_DOC", "Документ открыт"),
    entry(201, "DENIED_IN_CLOSED_DOC", "Документ закрыт"),
    entry(202, "LICENSE_MEMORY_OVERFLOW", "Нет места для сохранения лицензий"),
    entry(203, "NEED_CANCEL_DOCUMENT", "Документ необходимо отменить"),
    entry(204, "REGISTERS_NOT_INITIALIZED", "Регистры ККТ еще не инициализированы"),
    entry(205, "TOTAL_REQUIRED", "Требуется регистрация итога"),
    entry(206, "SETTINGS_FAULT", "Сбой таблицы настроек"),
    entry(207, "COUNTERS_FAULT", "Сбой счетчиков и регистров ККТ"),
    entry(208, "USER_MEMORY_FAULT", "Сбой пользовательской памяти"),
    entry(209, "SERVICE_COUNTERS_FAULT", "Сбой сервисных регистров"),
    entry(210, "ATTRIBUTES_FAULT", "Сбой реквизитов ККТ"),
    entry(211, "ALREADY_IN_UPDATE_MODE", "ККТ уже в режиме обновления конфигурации"),
    entry(212, "INVALID_FIRMWARE", "Конфигурация не прошла проверку"),
    entry(213, "INVALID_CHANNEL", "Аппаратный канал отсутствует"),
    entry(214, "INTERFACE_DOWN", "Сетевой интерфейс не подключен"),
    entry(215, "INVALID_FISCAL_PROPERTY_VALUE_1212_1030", "Недопустимое сочетание 1212 и 1030"),
    entry(216, "INVALID_FISCAL_PROPERTY_VALUE_1214", "Некорректный признак способа расчета"),
    entry(217, "INVALID_FISCAL_PROPERTY_VALUE_1212", "Некорректный признак предмета расчета"),
    entry(218, "SYNC_TIME", "Ошибка синхронизации времени"),
    entry(219, "VAT18_VAT20_IN_RECEIPT", "В чеке не может быть НДС 18% и 20%"),
    entry(220, "PICTURE_NOT_CLOSED", "Картинка не закрыта"),
    entry(221, "INTERFACE_BUSY", "Сетевой интерфейс занят"),
    entry(222, "INVALID_PICTURE_NUMBER", "Неверный номер картинки"),
    entry(223, "INVALID_CONTAINER", "Ошибка проверки контейнера"),
    entry(224, "ARCHIVE_CLOSED", "Архив ФН закрыт"),
    entry(225, "NEED_REGISTRATION", "Нужно выполнить регистрацию"),
    entry(226, "DENIED_DURING_UPDATE", "Идет обновление ПО ККТ"),
    entry(227, "INVALID_TOTAL", "Неверный итог чека"),
    entry(228, "MARKING_CODE_CONFLICT", "Запрещена одновременная передача КМ и 1162"),
    entry(229, "INVALID_RECORDS_ID", "Набор записей не найден"),
    entry(230, "INVALID_SIGNATURE", "Ошибка цифровой подписи"),
    entry(231, "INVALID_EXCISE_SUM", "Некорректная сумма акциза"),
    entry(232, "NO_DOCUMENTS_FOUND_IN_JOURNAL", "Документы не найдены в БД"),
    entry(233, "INVALID_SCRIPT_TYPE", "Неподдерживаемый тип скрипта"),
    entry(234, "INVALID_SCRIPT_NAME", "Некорректный идентификатор скрипта"),
    entry(235, "INVALID_POSITIONS_COUNT_WITH_1162", "Кол-во позиций с 1162/1163 превысило лимит"),
    entry(236, "INVALID_UC_COUNTER", "Универсальный счетчик недоступен"),
    entry(237, "INVALID_UC_TAG", "Неподдерживаемый тег для универсальных счетчиков"),
    entry(238, "INVALID_UC_IDX", "Некорректный индекс для универсальных счетчиков"),
    entry(239, "INVALID_UC_SIZE", "Неверный размер универсального счетчика"),
    entry(240, "INVALID_UC_CONFIG", "Неверная конфигурация универсальных счетчиков"),
    entry(241, "CONNECTION_LOST", "Соединение с ККТ потеряно"),
    entry(242, "UNIVERSAL_COUNTERS_FAULT", "Ошибка универсальных счетчиков"),
    entry(243, "INVALID_TAX_SUM", "Некорректная сумма налога"),
    entry(244, "INVALID_MARKING_CODE_TYPE", "Некорректное значение типа КМ"),
    entry(245, "LICENSE_HARD_FAULT", "Аппаратная ошибка при сохранении лицензии"),
    entry(246, "LICENSE_INVALID_SIGN", "Подпись лицензии некорректна"),
    entry(247, "LICENSE_INVALID_SERIAL", "Лицензия не подходит для данной ККТ"),
    entry(248, "LICENSE_INVALID_TIME", "Срок действия лицензии истёк"),
    entry(249, "DOCUMENT_CANCELED", "Документ был отменен"),
    entry(250, "INVALID_SCRIPT_PARAMS", "Некорректные параметры скрипта"),
    entry(251, "CLICHE_TOO_LONG", "Длина клише превышает максимальное значение"),
    entry(252, "COMMODITIES_TABLE_FAULT", "Ошибка таблицы товаров"),
    entry(253, "COMMODITIES_TABLE", "Общая ошибка таблицы товаров"),
    entry(254, "COMMODITIES_TABLE_INVALID_TAG", "Некорректный тег для таблицы товаров"),
    entry(255, "COMMODITIES_TABLE_INVALID_TAG_SIZE", "Некорректный размер тега"),
    entry(256, "COMMODITIES_TABLE_NO_TAG_DATA", "Нет данных по тегу"),
    entry(257, "COMMODITIES_TABLE_NO_FREE_MEMORY", "Нет места в таблице товаров"),
    entry(258, "INVALID_CACHE", "Ошибка чтения/записи данных кеша"),
    entry(259, "SCHEDULER_NOT_READY", "Функции планировщика не доступны"),
    entry(260, "SCHEDULER_INVALID_TASK", "Неизвестный тип задания планировщика"),
    entry(261, "MINIPOS_NO_POSITION_PAYMENT", "Отсутствует позиция оплаты"),
    entry(262, "MINIPOS_COMMAND_TIME_OUT", "Таймаут выполнения команды истек"),
    entry(263, "MINIPOS_MODE_FR_DISABLED", "Режим ФР выключен"),
    entry(264, "ENTRY_NOT_FOUND_IN_OTP", "Не найдена запись в OTP"),
    entry(265, "EXCISABLE_COMMODITY_WITHOUT_EXCISE", "Подакцизный товар без акциза"),
    entry(266, "BARCODE_TYPE_NOT_SUPPORTED", "Тип штрихкода не поддерживается"),
    entry(267, "OVERLAY_DATA_OVERFLOW", "Размер данных превышает допустимый"),
    entry(268, "INVALID_MODULE_ADDRESS", "Ошибка чтения адреса модуля и сегмента"),
    entry(269, "ECR_MODEL_NOT_SUPPORTED", "Данная модель ККТ не поддерживается"),
    entry(401, "MARKING_CODE_VALIDATION_IN_PROGRESS", "Процедура проверки КМ уже запущена"),
    entry(402, "NO_CONNECTION_WITH_SERVER", "Ошибка соединения с сервером"),
    entry(403, "MARKING_CODE_VALIDATION_CANCELED", "Процедура проверки КМ прервана"),
    entry(404, "INVALID_MARKING_CODE_STATUS", "Некорректное значение статуса КМ"),
    entry(405, "INVALID_GS1", "Неверный код GS1"),
    entry(406, "MARKING_WORK_DENIED", "Запрещена работа с маркированным товарами"),
    entry(407, "MARKING_WORK_TEMPORARY_BLOCKED", "Работа с маркированными товарами временно заблокирована"),
    entry(408, "MARKS_OVERFLOW", "Переполнена таблица хранения КМ"),
    entry(409, "INVALID_MARKING_CODE", "Некорректный код маркировки"),
    entry(410, "INVALID_STATE", "Неверное состояние"),
    entry(411, "OFD_EXCHANGE", "Ошибка обмена с сервером ОФД или ИСМ"),
    entry(412, "INVALID_MEASUREMENT_UNIT", "Некорректное значение единиц измерения"),
    entry(413, "OPERATION_DENIED_IN_CURRENT_FFD", "Операция не разрешена в данной версии ФФД"),
    entry(414, "MARKING_OPERATION_DENIED", "Операция не разрешена"),
    entry(415, "NO_DATA_TO_SEND", "Нет данных для отправки"),
    entry(416, "NO_MARKED_POSITION", "Нет маркированных позиций в чеке"),
    entry(417, "HAS_NOT_SEND_NOTICES", "Имеются неотправленные уведомления"),
    entry(418, "UPDATE_KEYS_REQUIRED", "Требуется повторное обновление ключей"),
    entry(419, "UPDATE_KEYS_SERVICE", "Ошибка сервиса обновления ключей"),
    entry(420, "MARK_NOT_CHECKED", "КМ не проверен в ФН"),
    entry(421, "MARK_CHECK_TIMEOUT_EXPIRED", "Истёк таймаут проверки КМ"),
    entry(422, "NO_MARKING_CODE_IN_TABLE", "КМ отсутствует в таблице"),
    entry(423, "CHEKING_MARK_IN_PROGRESS", "Выполняется проверка КМ"),
    entry(424, "INVALID_SERVER_ADDRESS", "Настройки адреса сервера не заданы"),
    entry(425, "UPDATE_KEYS_TIMEOUT", "Истёк таймаут обновления ключей"),
    entry(426, "PROPERTY_FOR_MARKING_POSITION_ONLY", "Реквизит только для маркированной позиции"),
    entry(501, "RECEIPT_PARSE_ERROR", "Ошибка парсинга запроса"),
    entry(502, "INTERRUPTED_BY_PREVIOUS_ERRORS", "Выполнение прервано из-за предыдущих ошибок"),
    entry(503, "DRIVER_SCRIPT_ERROR", "Ошибка скрипта драйвера"),
    entry(504, "VALIDATE_FUNC_NOT_FOUND", "Функция проверки задания не найдена"),
    entry(601, "RCP_SERVER_BUSY", "Устройство занято другим клиентом"),
    entry(602, "RCP_SERVER_VERSION", "Некорректная версия протокола"),
    entry(603, "RCP_SERVER_EXCHANGE", "Ошибка обмена с сервером"),
];

// =============================================================================
// Unit Tests
// =============================================================================
